//! User lookup and password verification seams.
//!
//! The persistence layer behind these traits is an external collaborator;
//! the pipeline only asks whether a user exists for a username and whether a
//! password verifies. [`InMemoryUserStore`] implements both for tests, the
//! bundled binary and small deployments.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::RwLock;

/// A loaded user, attached to the controller once authentication succeeds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub username: String,
    /// Free-form attributes owned by the persistence layer
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            attributes: Map::new(),
        }
    }
}

/// Finds users by username.
pub trait UserLookup: Send + Sync {
    /// Return the loaded user, or `None` when no user has that name.
    ///
    /// # Errors
    ///
    /// Collaborator failures (e.g. an unavailable database) are returned as
    /// errors and presented to the client as a 500.
    fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
}

/// Verifies a password for a username.
pub trait PasswordVerifier: Send + Sync {
    /// `Ok(true)` when the password is correct for that user.
    ///
    /// # Errors
    ///
    /// Collaborator failures are returned as errors, not as `false`.
    fn verify(&self, username: &str, password: &str) -> anyhow::Result<bool>;
}

struct StoredUser {
    user: User,
    salt: String,
    digest: Vec<u8>,
}

fn password_digest(salt: &str, password: &str) -> Vec<u8> {
    Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(b":")
        .chain_update(password.as_bytes())
        .finalize()
        .to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// In-memory user store holding salted SHA-256 password digests.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, StoredUser>>,
}

impl InMemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a user with a plaintext password, which is only kept as
    /// a salted digest.
    pub fn insert(&self, user: User, password: &str) {
        let salt = ulid::Ulid::new().to_string();
        let digest = password_digest(&salt, password);
        let stored = StoredUser { user, salt, digest };
        match self.users.write() {
            Ok(mut users) => {
                users.insert(stored.user.username.clone(), stored);
            }
            Err(poisoned) => {
                poisoned
                    .into_inner()
                    .insert(stored.user.username.clone(), stored);
            }
        }
    }

    /// Builder-style variant of [`InMemoryUserStore::insert`].
    #[must_use]
    pub fn with_user(self, username: &str, password: &str) -> Self {
        self.insert(User::new(username), password);
        self
    }

    /// Number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().map(|u| u.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserLookup for InMemoryUserStore {
    fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let users = self
            .users
            .read()
            .map_err(|_| anyhow::anyhow!("user store lock poisoned"))?;
        Ok(users.get(username).map(|stored| stored.user.clone()))
    }
}

impl PasswordVerifier for InMemoryUserStore {
    fn verify(&self, username: &str, password: &str) -> anyhow::Result<bool> {
        let users = self
            .users
            .read()
            .map_err(|_| anyhow::anyhow!("user store lock poisoned"))?;
        Ok(users.get(username).is_some_and(|stored| {
            constant_time_eq(&stored.digest, &password_digest(&stored.salt, password))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_verify() {
        let store = InMemoryUserStore::new().with_user("alice", "wonderland");
        assert_eq!(store.len(), 1);
        let user = store.find_by_username("alice").unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert!(store.verify("alice", "wonderland").unwrap());
        assert!(!store.verify("alice", "Wonderland").unwrap());
        assert!(!store.verify("bob", "wonderland").unwrap());
        assert!(store.find_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn test_insert_replaces_password() {
        let store = InMemoryUserStore::new().with_user("alice", "old");
        store.insert(User::new("alice"), "new");
        assert_eq!(store.len(), 1);
        assert!(store.verify("alice", "new").unwrap());
        assert!(!store.verify("alice", "old").unwrap());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
