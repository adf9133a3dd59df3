//! Utility modules supporting the client.
//!
//! - [`HttpClient`]: pooled reqwest client with timeout and user agent defaults

mod http;

pub use http::{HttpClient, DEFAULT_USER_AGENT};
