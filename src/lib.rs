pub mod api;
pub mod app_state;
pub mod config;
pub mod engine;
pub mod extractor;
pub mod fetcher;
pub mod health;
pub mod middleware;
