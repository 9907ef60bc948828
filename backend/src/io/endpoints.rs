//! # Account Endpoints
//!
//! Transport-independent request/response contract for the account service.
//! Each operation has its own request type and its own method, so a decoded
//! request can only ever reach the operation it was decoded for.

use shared::{Account, Filter, Pagination};

use crate::domain::{AccountService, DomainResult};

/// Parameters for fetching one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAccountRequest {
    pub id: String,
}

/// Parameters for listing accounts
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetAccountsRequest {
    pub filter: Filter,
    pub pagination: Pagination,
}

/// Account to merge into the stored one; its id is always set
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateAccountRequest {
    pub account: Account,
}

/// Account to create
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreateAccountRequest {
    pub account: Account,
}

/// Parameters for deleting one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteAccountRequest {
    pub id: String,
}

#[derive(Clone)]
pub struct AccountEndpoints {
    service: AccountService,
}

impl AccountEndpoints {
    pub fn new(service: AccountService) -> Self {
        Self { service }
    }

    pub async fn get_account(&self, request: GetAccountRequest) -> DomainResult<Account> {
        self.service.get_account(&request.id).await
    }

    pub async fn get_accounts(&self, request: GetAccountsRequest) -> DomainResult<Vec<Account>> {
        self.service
            .get_accounts(&request.filter, request.pagination)
            .await
    }

    pub async fn update_account(&self, request: UpdateAccountRequest) -> DomainResult<Account> {
        self.service.update_account(request.account).await
    }

    pub async fn create_account(&self, request: CreateAccountRequest) -> DomainResult<String> {
        self.service.create_account(request.account).await
    }

    pub async fn delete_account(&self, request: DeleteAccountRequest) -> DomainResult<()> {
        self.service.delete_account(&request.id).await
    }
}
