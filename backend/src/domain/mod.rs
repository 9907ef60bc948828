//! # Domain Module
//!
//! Business rules for accounts. There are very few: the service is a thin
//! layer over [`AccountStorage`](crate::storage::AccountStorage) that turns
//! "no such document" into a typed [`DomainError::NotFound`].

pub mod account_service;
pub mod error;

pub use account_service::AccountService;
pub use error::{DomainError, DomainResult};
