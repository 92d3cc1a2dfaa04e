use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::storage::{KvStore, StorageError};

pub const AUTH_RECORD: &str = "auth-storage";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("malformed auth record: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionKind {
    Monthly,
    Annual,
}

impl SubscriptionKind {
    fn term(&self) -> Duration {
        match self {
            SubscriptionKind::Monthly => Duration::days(30),
            SubscriptionKind::Annual => Duration::days(365),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(rename = "type")]
    pub kind: SubscriptionKind,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub subscription: Option<Subscription>,
    pub created_at: DateTime<Utc>,
}

/// Where credentials are checked and new accounts land. Swappable for a real
/// identity provider without touching the auth store.
pub trait UserDirectory {
    fn find_by_credentials(&self, email: &str, password: &str) -> Option<User>;
    fn insert(&self, email: &str, password: &str, role: Role) -> User;
}

struct CredentialRecord {
    user: User,
    password: String,
}

/// In-memory directory seeded with the demo admin account.
pub struct MockDirectory {
    records: Mutex<Vec<CredentialRecord>>,
}

impl MockDirectory {
    pub fn seeded() -> Self {
        let admin = CredentialRecord {
            user: User {
                id: Uuid::new_v4(),
                email: "admin@example.com".into(),
                role: Role::Admin,
                subscription: None,
                created_at: Utc::now(),
            },
            password: "admin123".into(),
        };
        Self {
            records: Mutex::new(vec![admin]),
        }
    }
}

impl UserDirectory for MockDirectory {
    fn find_by_credentials(&self, email: &str, password: &str) -> Option<User> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user.email == email && r.password == password)
            .map(|r| r.user.clone())
    }

    fn insert(&self, email: &str, password: &str, role: Role) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: email.into(),
            role,
            subscription: None,
            created_at: Utc::now(),
        };
        self.records.lock().unwrap().push(CredentialRecord {
            user: user.clone(),
            password: password.into(),
        });
        user
    }
}

/// Signed-out/signed-in state machine with the current user persisted under
/// the `auth-storage` record.
pub struct AuthStore<D: UserDirectory, S: KvStore> {
    directory: D,
    store: S,
    current: Option<User>,
}

impl<D: UserDirectory, S: KvStore> AuthStore<D, S> {
    pub fn load(directory: D, store: S) -> Result<Self, AuthError> {
        let current = match store.read(AUTH_RECORD)? {
            Some(raw) => Some(serde_json::from_str(&raw)?),
            None => None,
        };
        Ok(Self {
            directory,
            store,
            current,
        })
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn sign_in(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .directory
            .find_by_credentials(email, password)
            .ok_or(AuthError::InvalidCredentials)?;
        info!("signed in as {}", user.email);
        self.replace_current(Some(user.clone()))?;
        Ok(user)
    }

    /// Always succeeds: synthesizes a fresh account with role `user` and
    /// signs it in.
    pub fn sign_up(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self.directory.insert(email, password, Role::User);
        info!("signed up {}", user.email);
        self.replace_current(Some(user.clone()))?;
        Ok(user)
    }

    pub fn sign_out(&mut self) -> Result<(), AuthError> {
        self.replace_current(None)
    }

    /// Mutates the current user's subscription in place; expiry is now plus
    /// 30 days (monthly) or 365 days (annual). Silently does nothing when
    /// signed out.
    pub fn update_subscription(
        &mut self,
        kind: SubscriptionKind,
    ) -> Result<Option<&Subscription>, AuthError> {
        let Some(user) = self.current.as_mut() else {
            debug!("subscription update while signed out, ignoring");
            return Ok(None);
        };
        user.subscription = Some(Subscription {
            kind,
            expires_at: Utc::now() + kind.term(),
        });
        self.persist()?;
        Ok(self.current.as_ref().and_then(|u| u.subscription.as_ref()))
    }

    fn replace_current(&mut self, user: Option<User>) -> Result<(), AuthError> {
        self.current = user;
        self.persist()
    }

    fn persist(&self) -> Result<(), AuthError> {
        match &self.current {
            Some(user) => {
                let raw = serde_json::to_string(user)?;
                self.store.write(AUTH_RECORD, &raw)?;
            }
            None => self.store.remove(AUTH_RECORD)?,
        }
        Ok(())
    }
}
