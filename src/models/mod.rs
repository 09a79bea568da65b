pub mod client_profiles;
pub mod portfolio_images;
pub mod portfolios;
pub mod profiles;
pub mod projects;
pub mod quotes;
pub mod service_categories;
pub mod vendor_categories;
pub mod vendor_profiles;
