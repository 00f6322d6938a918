//! Credential store boundary and its SQLite implementation

use crate::core::error::Result;
use crate::db::manager::DatabaseManager;
use crate::db::models::User;
use async_trait::async_trait;
use rusqlite::OptionalExtension;
use std::sync::Arc;

/// Persistence capability the auth service consumes
///
/// Implementations must reject a second user with an email that is already
/// stored; the service's own existence check is not atomic with `insert`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find a user by email, `None` if no such user exists
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert a new user
    async fn insert(&self, user: &User) -> Result<()>;
}

/// Credential store backed by the `users` table
pub struct SqliteCredentialStore {
    db: Arc<DatabaseManager>,
}

impl SqliteCredentialStore {
    /// Create a new SqliteCredentialStore
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();
        self.db.execute(move |conn| {
            let user = conn.query_row(
                "SELECT id, full_name, email, password_hash, role_code, created_at, created_by \
                 FROM users WHERE email = ?",
                [&email],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        full_name: row.get(1)?,
                        email: row.get(2)?,
                        password_hash: row.get(3)?,
                        role_code: row.get(4)?,
                        created_at: row.get(5)?,
                        created_by: row.get(6)?,
                    })
                }
            ).optional()?;
            Ok(user)
        }).await
    }

    async fn insert(&self, user: &User) -> Result<()> {
        let user = user.clone();
        self.db.execute(move |conn| {
            conn.execute(
                "INSERT INTO users (id, full_name, email, password_hash, role_code, created_at, created_by) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    &user.id,
                    &user.full_name,
                    &user.email,
                    &user.password_hash,
                    &user.role_code,
                    &user.created_at,
                    &user.created_by,
                ],
            )?;
            Ok(())
        }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ServiceError;
    use crate::db::models::ROLE_CUSTOMER;
    use chrono::{TimeZone, Utc};

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            full_name: "Alice".to_string(),
            email: email.to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuu".to_string(),
            role_code: ROLE_CUSTOMER.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            created_by: Some("Alice".to_string()),
        }
    }

    fn store() -> SqliteCredentialStore {
        SqliteCredentialStore::new(Arc::new(DatabaseManager::new_in_memory().unwrap()))
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = store();
        let alice = user("u-1", "a@x.com");

        store.insert(&alice).await.unwrap();
        let found = store.find_by_email("a@x.com").await.unwrap();

        assert_eq!(found, Some(alice));
    }

    #[tokio::test]
    async fn test_find_missing_email() {
        let store = store();
        assert!(store.find_by_email("nobody@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = store();
        store.insert(&user("u-1", "a@x.com")).await.unwrap();

        let err = store.insert(&user("u-2", "a@x.com")).await.unwrap_err();

        assert!(matches!(err, ServiceError::Database(_)));
        assert!(err.is_internal());
        let stored = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.id, "u-1");
    }
}
