//! # REST API Interface Layer
//!
//! HTTP transport for the account service:
//! - routing and request decoding (`account_apis`)
//! - the central error-to-status mapping (`error`)
//! - the liveness check (`health_apis`)

pub mod account_apis;
pub mod error;
pub mod health_apis;

pub use error::ApiError;
