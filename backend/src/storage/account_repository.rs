use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use shared::{Account, Filter, Pagination};
use sqlx::{sqlite::SqliteRow, Connection, QueryBuilder, Row, Sqlite};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use crate::storage::connection::DbConnection;
use crate::storage::traits::AccountStorage;

/// Account repository over the SQLite document collection.
///
/// Every operation checks out its own pooled connection and hands it back
/// when the operation returns, error paths included.
#[derive(Clone)]
pub struct AccountRepository {
    db: DbConnection,
}

impl AccountRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Generate a new account identifier (32 lowercase hex characters)
    pub fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn decode_document(row: &SqliteRow) -> Result<Account> {
        let document: String = row.get("document");
        serde_json::from_str(&document).context("Stored account document is not valid JSON")
    }

    fn encode_document(account: &Account) -> Result<String> {
        serde_json::to_string(account).context("Failed to serialize account document")
    }
}

#[async_trait]
impl AccountStorage for AccountRepository {
    async fn get_account(&self, account_id: &str) -> Result<Option<Account>> {
        let mut conn = self.db.acquire().await?;

        let row = sqlx::query(
            r#"
            SELECT document
            FROM accounts
            WHERE account_id = ?
            "#,
        )
        .bind(account_id)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(r) => Ok(Some(Self::decode_document(&r)?)),
            None => Ok(None),
        }
    }

    async fn get_accounts(&self, filter: &Filter, pagination: Pagination) -> Result<Vec<Account>> {
        let mut conn = self.db.acquire().await?;

        let mut query = QueryBuilder::<Sqlite>::new("SELECT document FROM accounts");
        if !filter.is_unrestricted() {
            // One bind parameter for the whole id list, whatever its length
            let mut seen = HashSet::new();
            let ids: Vec<&str> = filter
                .ids
                .iter()
                .map(String::as_str)
                .filter(|id| seen.insert(*id))
                .collect();
            let ids = serde_json::to_string(&ids).context("Failed to encode id filter")?;

            query
                .push(" WHERE account_id IN (SELECT value FROM json_each(")
                .push_bind(ids)
                .push("))");
        }
        // `page` is the number of documents to skip
        query
            .push(" ORDER BY seq ASC LIMIT ")
            .push_bind(i64::from(pagination.size))
            .push(" OFFSET ")
            .push_bind(i64::from(pagination.page));

        let rows = query.build().fetch_all(&mut *conn).await?;
        debug!(
            "Fetched {} accounts (ids={:?}, size={}, skip={})",
            rows.len(),
            filter.ids,
            pagination.size,
            pagination.page
        );

        rows.iter().map(Self::decode_document).collect()
    }

    async fn create_account(&self, account: Account) -> Result<String> {
        let mut conn = self.db.acquire().await?;

        let account_id = Self::generate_id();
        let account = account.with_id(account_id.clone());
        let document = Self::encode_document(&account)?;

        sqlx::query(
            r#"
            INSERT INTO accounts (account_id, document)
            VALUES (?, ?)
            "#,
        )
        .bind(&account_id)
        .bind(document)
        .execute(&mut *conn)
        .await?;

        Ok(account_id)
    }

    async fn update_account(&self, account: Account) -> Result<Option<Account>> {
        let account_id = account
            .id()
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("Cannot update an account without account_id"))?;

        let mut conn = self.db.acquire().await?;
        let mut tx = conn.begin().await?;

        let row = sqlx::query("SELECT document FROM accounts WHERE account_id = ?")
            .bind(&account_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            // Dropping the transaction rolls it back
            return Ok(None);
        };

        let mut stored = Self::decode_document(&row)?;
        stored.profile.extend(account.profile);
        let document = Self::encode_document(&stored)?;

        sqlx::query("UPDATE accounts SET document = ? WHERE account_id = ?")
            .bind(document)
            .bind(&account_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(stored))
    }

    async fn delete_account(&self, account_id: &str) -> Result<bool> {
        let mut conn = self.db.acquire().await?;

        let result = sqlx::query("DELETE FROM accounts WHERE account_id = ?")
            .bind(account_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    async fn setup_test() -> AccountRepository {
        let db = DbConnection::in_memory().await.expect("Failed to create test database");
        AccountRepository::new(db)
    }

    fn account(name: &str) -> Account {
        let mut profile = Map::new();
        profile.insert("name".to_string(), Value::String(name.to_string()));
        Account::new(profile)
    }

    fn names(accounts: &[Account]) -> Vec<String> {
        accounts
            .iter()
            .map(|a| a.profile["name"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_create_and_get_account() {
        let repo = setup_test().await;

        let id = repo.create_account(account("alice")).await.expect("Failed to create account");
        assert!(!id.is_empty());
        assert_eq!(id.len(), 32);

        let stored = repo.get_account(&id).await.unwrap().expect("Account should exist");
        assert_eq!(stored.id(), Some(id.as_str()));
        assert_eq!(stored.profile["name"], json!("alice"));
    }

    #[tokio::test]
    async fn test_create_generates_unique_ids() {
        let repo = setup_test().await;

        let mut ids = HashSet::new();
        for i in 0..20 {
            let id = repo.create_account(account(&format!("user{i}"))).await.unwrap();
            assert!(ids.insert(id), "Generated ids must be unique");
        }
    }

    #[tokio::test]
    async fn test_create_overwrites_client_supplied_id() {
        let repo = setup_test().await;

        let id = repo.create_account(account("bob").with_id("chosen-by-client")).await.unwrap();
        assert_ne!(id, "chosen-by-client");

        assert!(repo.get_account("chosen-by-client").await.unwrap().is_none());
        assert!(repo.get_account(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_get_nonexistent_account() {
        let repo = setup_test().await;

        let result = repo.get_account("missing").await.expect("Query failed");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_accounts_unrestricted_in_insertion_order() {
        let repo = setup_test().await;
        for name in ["a", "b", "c"] {
            repo.create_account(account(name)).await.unwrap();
        }

        let all = repo.get_accounts(&Filter::default(), Pagination::default()).await.unwrap();
        assert_eq!(names(&all), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_get_accounts_filtered_by_ids() {
        let repo = setup_test().await;
        let first = repo.create_account(account("a")).await.unwrap();
        let _second = repo.create_account(account("b")).await.unwrap();
        let third = repo.create_account(account("c")).await.unwrap();

        let filter = Filter::by_ids([first, third, "unknown".to_string()]);
        let found = repo.get_accounts(&filter, Pagination::default()).await.unwrap();
        assert_eq!(names(&found), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_get_accounts_with_more_ids_than_bind_parameters() {
        let repo = setup_test().await;
        let first = repo.create_account(account("a")).await.unwrap();
        let _second = repo.create_account(account("b")).await.unwrap();
        let third = repo.create_account(account("c")).await.unwrap();

        // Well past SQLite's bind-parameter limit, repeats included
        let mut ids: Vec<String> = (0..40_000).map(|i| format!("unknown-{i}")).collect();
        ids.push(third.clone());
        ids.push(first.clone());
        ids.push(third);

        let found = repo
            .get_accounts(&Filter::by_ids(ids), Pagination::default())
            .await
            .expect("Large id filter should not fail");
        assert_eq!(names(&found), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_get_accounts_filter_without_matches() {
        let repo = setup_test().await;
        repo.create_account(account("a")).await.unwrap();

        let found = repo
            .get_accounts(&Filter::by_ids(["1", "2"]), Pagination::default())
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_page_is_a_skip_count() {
        let repo = setup_test().await;
        for name in ["a", "b", "c", "d", "e"] {
            repo.create_account(account(name)).await.unwrap();
        }

        let window = repo
            .get_accounts(&Filter::default(), Pagination { size: 2, page: 3 })
            .await
            .unwrap();
        assert_eq!(names(&window), vec!["d", "e"]);

        let window = repo
            .get_accounts(&Filter::default(), Pagination { size: 2, page: 1 })
            .await
            .unwrap();
        assert_eq!(names(&window), vec!["b", "c"]);

        let past_end = repo
            .get_accounts(&Filter::default(), Pagination { size: 10, page: 5 })
            .await
            .unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn test_pagination_applies_after_filter() {
        let repo = setup_test().await;
        let mut ids = Vec::new();
        for name in ["a", "b", "c", "d"] {
            ids.push(repo.create_account(account(name)).await.unwrap());
        }

        let filter = Filter::by_ids([ids[1].clone(), ids[2].clone(), ids[3].clone()]);
        let window = repo
            .get_accounts(&filter, Pagination { size: 1, page: 1 })
            .await
            .unwrap();
        assert_eq!(names(&window), vec!["c"]);
    }

    #[tokio::test]
    async fn test_update_merges_profile() {
        let repo = setup_test().await;
        let id = repo.create_account(account("alice")).await.unwrap();

        let mut patch = Map::new();
        patch.insert("email".to_string(), json!("alice@example.com"));
        patch.insert("name".to_string(), json!("Alice"));

        let updated = repo
            .update_account(Account::new(patch).with_id(id.clone()))
            .await
            .unwrap()
            .expect("Account should exist");

        assert_eq!(updated.id(), Some(id.as_str()));
        assert_eq!(updated.profile["name"], json!("Alice"));
        assert_eq!(updated.profile["email"], json!("alice@example.com"));

        let stored = repo.get_account(&id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_nonexistent_account() {
        let repo = setup_test().await;

        let result = repo.update_account(account("ghost").with_id("missing")).await.unwrap();
        assert!(result.is_none());

        // Nothing was inserted
        let all = repo.get_accounts(&Filter::default(), Pagination::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let repo = setup_test().await;

        assert!(repo.update_account(account("nobody")).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_account() {
        let repo = setup_test().await;
        let id = repo.create_account(account("carol")).await.unwrap();

        let deleted = repo.delete_account(&id).await.expect("Failed to delete account");
        assert!(deleted);
        assert!(repo.get_account(&id).await.unwrap().is_none());

        // Deleting again is not an error
        let deleted_again = repo.delete_account(&id).await.expect("Re-delete should not fail");
        assert!(!deleted_again);
    }
}
