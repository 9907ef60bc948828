//! # Storage Module
//!
//! Persistence for account documents.
//!
//! Accounts live in a single collection. The domain layer talks to it only
//! through the [`AccountStorage`] trait; [`AccountRepository`] is the SQLite
//! implementation, with [`DbConnection`] owning the pool and the schema.
//!
//! ## Collection layout
//!
//! - one row per account, the full account serialized as a JSON `document`
//! - `account_id` copied into its own column with a partial unique index,
//!   which is what guarantees identifier uniqueness
//! - an autoincrement `seq` column giving list queries a stable insertion order

pub mod account_repository;
pub mod connection;
pub mod traits;

pub use account_repository::AccountRepository;
pub use connection::DbConnection;
pub use traits::AccountStorage;
