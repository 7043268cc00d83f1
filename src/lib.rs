// src/lib.rs

//! Backend for a basketball-equipment storefront: authentication, catalog,
//! cart, checkout into orders/invoices, reviews, moderation reports and
//! wishlists, served as a JSON API over PostgreSQL.

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod web;

pub use config::AppConfig;
pub use errors::AppError;
pub use state::AppState;
