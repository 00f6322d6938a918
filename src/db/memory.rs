//! In-memory credential store

use crate::core::error::{Result, ServiceError};
use crate::db::models::User;
use crate::db::repository::CredentialStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::warn;

/// Credential store holding users in a map keyed by email
///
/// Enforces email uniqueness under the write lock, the same guarantee the
/// SQLite store gets from its UNIQUE constraint.
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        match self.users.read() {
            Ok(users) => users.len(),
            Err(_) => {
                warn!("User map lock poisoned; reporting it as empty");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| ServiceError::Store("user map lock poisoned".to_string()))?;
        Ok(users.get(email).cloned())
    }

    async fn insert(&self, user: &User) -> Result<()> {
        let mut users = self
            .users
            .write()
            .map_err(|_| ServiceError::Store("user map lock poisoned".to_string()))?;

        if users.contains_key(&user.email) {
            return Err(ServiceError::Store(format!(
                "unique constraint violated: email {}",
                user.email
            )));
        }

        users.insert(user.email.clone(), user.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ROLE_CUSTOMER;
    use chrono::Utc;

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            full_name: "Bob".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role_code: ROLE_CUSTOMER.to_string(),
            created_at: Utc::now(),
            created_by: Some("Bob".to_string()),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let store = MemoryCredentialStore::new();
        assert!(store.is_empty());

        store.insert(&user("1", "b@x.com")).await.unwrap();

        let found = store.find_by_email("b@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, "1");
        assert!(store.find_by_email("c@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_keeps_first_user() {
        let store = MemoryCredentialStore::new();
        store.insert(&user("1", "b@x.com")).await.unwrap();

        let err = store.insert(&user("2", "b@x.com")).await.unwrap_err();

        assert!(matches!(err, ServiceError::Store(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_by_email("b@x.com").await.unwrap().unwrap().id, "1");
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_store_error() {
        let store = std::sync::Arc::new(MemoryCredentialStore::new());
        store.insert(&user("1", "b@x.com")).await.unwrap();

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.users.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(store.len(), 0);
        assert!(matches!(
            store.find_by_email("b@x.com").await,
            Err(ServiceError::Store(_))
        ));
    }
}
