pub mod auth_services;
pub mod feed_services;
