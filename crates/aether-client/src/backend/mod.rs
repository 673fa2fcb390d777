//! HTTP implementation of the backend REST surface.

mod api;
mod client;
mod config;

pub use client::HttpBackend;
pub use config::ApiConfig;
