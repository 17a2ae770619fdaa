//! HTTP transport module
//!
//! Talks to the listing endpoint over reqwest.
//!
//! # Features
//!
//! - **Bearer Auth**: Each request carries the access token it was given
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Response Classification**: 401, application messages, bad statuses
//!   and undecodable bodies map to distinct errors

mod client;
mod rate_limit;

pub use client::{HttpClientConfig, HttpClientConfigBuilder, HttpListingClient};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
