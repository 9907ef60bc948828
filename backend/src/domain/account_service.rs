use std::sync::Arc;

use shared::{Account, Filter, Pagination};
use tracing::{info, warn};

use crate::domain::error::{DomainError, DomainResult};
use crate::storage::AccountStorage;

/// Service for managing accounts.
///
/// Almost everything is delegated to storage. The one rule it owns is that a
/// lookup or update of an unknown account is a `NotFound` error rather than
/// an empty result.
#[derive(Clone)]
pub struct AccountService {
    storage: Arc<dyn AccountStorage>,
}

impl AccountService {
    /// Create a new AccountService
    pub fn new(storage: Arc<dyn AccountStorage>) -> Self {
        Self { storage }
    }

    /// Get an account by ID
    pub async fn get_account(&self, account_id: &str) -> DomainResult<Account> {
        info!("Getting account: {}", account_id);

        match self.storage.get_account(account_id).await? {
            Some(account) => Ok(account),
            None => {
                warn!("Account not found: {}", account_id);
                Err(DomainError::NotFound)
            }
        }
    }

    /// List accounts matching `filter`, windowed by `pagination`
    pub async fn get_accounts(
        &self,
        filter: &Filter,
        pagination: Pagination,
    ) -> DomainResult<Vec<Account>> {
        info!(
            "Listing accounts: ids={:?}, size={}, page={}",
            filter.ids, pagination.size, pagination.page
        );

        let accounts = self.storage.get_accounts(filter, pagination).await?;
        info!("Found {} accounts", accounts.len());
        Ok(accounts)
    }

    /// Create an account and return its generated ID
    pub async fn create_account(&self, account: Account) -> DomainResult<String> {
        let account_id = self.storage.create_account(account).await?;
        info!("Created account with ID: {}", account_id);
        Ok(account_id)
    }

    /// Merge `account` into the stored account with the same ID
    pub async fn update_account(&self, account: Account) -> DomainResult<Account> {
        let account_id = account.id().unwrap_or_default().to_string();
        info!("Updating account: {}", account_id);

        match self.storage.update_account(account).await? {
            Some(updated) => Ok(updated),
            None => {
                warn!("Cannot update missing account: {}", account_id);
                Err(DomainError::NotFound)
            }
        }
    }

    /// Delete an account. Deleting an unknown account succeeds.
    pub async fn delete_account(&self, account_id: &str) -> DomainResult<()> {
        let deleted = self.storage.delete_account(account_id).await?;
        if deleted {
            info!("Deleted account: {}", account_id);
        } else {
            info!("Delete requested for unknown account: {}", account_id);
        }
        Ok(())
    }
}
