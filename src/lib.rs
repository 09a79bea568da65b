pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;
pub mod storage;

pub use db::create_pool;
