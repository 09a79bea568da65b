pub mod lifecycle;
pub mod portfolios;
pub mod pricing;
pub mod projects;
pub mod quotes;
pub mod vendors;
