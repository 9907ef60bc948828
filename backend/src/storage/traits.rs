//! # Storage Traits
//!
//! The storage abstraction the domain layer is written against. The domain
//! only ever sees `AccountStorage`, so a different document store can be
//! dropped in without touching the service.

use anyhow::Result;
use async_trait::async_trait;
use shared::{Account, Filter, Pagination};

/// Account document operations
#[async_trait]
pub trait AccountStorage: Send + Sync {
    /// Look up one account by identifier. A missing account is `Ok(None)`.
    async fn get_account(&self, account_id: &str) -> Result<Option<Account>>;

    /// List accounts restricted by `filter`, skipping `pagination.page`
    /// matches and returning at most `pagination.size`, in insertion order
    async fn get_accounts(&self, filter: &Filter, pagination: Pagination) -> Result<Vec<Account>>;

    /// Store a new account under a freshly generated identifier and return it.
    /// Any identifier already present on `account` is replaced.
    async fn create_account(&self, account: Account) -> Result<String>;

    /// Merge the profile fields of `account` into the stored document with the
    /// same identifier. Returns the merged document, or `None` if there is no
    /// such account.
    async fn update_account(&self, account: Account) -> Result<Option<Account>>;

    /// Remove an account.
    /// Returns true if a document was removed; a missing account is not an error
    async fn delete_account(&self, account_id: &str) -> Result<bool>;
}
