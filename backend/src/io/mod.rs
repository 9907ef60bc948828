//! # IO Module
//!
//! Everything between the outside world and the domain layer.
//!
//! - **endpoints**: typed request/response contract, one method per operation
//! - **rest**: HTTP transport built on axum, decoding requests into endpoint
//!   requests and encoding results and errors back into responses

pub mod endpoints;
pub mod rest;

pub use endpoints::AccountEndpoints;
