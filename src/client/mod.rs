//! HTTP Client and related utilities

mod config;
mod http;
mod rate_limiter;

pub use config::ExchangeConfig;
pub use http::{HttpClient, HttpResponse};
pub use rate_limiter::RateLimiter;
