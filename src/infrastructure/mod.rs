pub mod auth;
pub mod cache;
pub mod media;
pub mod store;
