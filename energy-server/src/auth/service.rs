use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use energy_db::{Account, AccountStore, InsertOutcome, PasswordHasher};
use log::{info, warn};

use super::{AuthError, Credentials};

/// Hashed at start-up so that logins for unknown usernames still pay for one
/// full verification.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-users";

#[derive(Debug, PartialEq, Eq)]
pub struct Registered {
    pub username: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Authenticated {
    pub username: String,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
    decoy_hash: Arc<str>,
    store_timeout: Duration,
}

impl AuthService {
    pub fn new(store: Arc<dyn AccountStore>, store_timeout: Duration) -> anyhow::Result<Self> {
        let hasher = PasswordHasher::new()?;
        let decoy_hash = hasher.hash(DECOY_PASSWORD)?;
        Ok(Self {
            store,
            hasher,
            decoy_hash: decoy_hash.into(),
            store_timeout,
        })
    }

    pub async fn register(&self, credentials: Credentials) -> Result<Registered, AuthError> {
        let username = credentials.username();

        // Fast path only; the store's insert decides uniqueness.
        if self.find(username).await?.is_some() {
            warn!("Registration rejected, username {username:?} already registered");
            return Err(AuthError::DuplicateAccount);
        }

        let password_hash = self.hash(credentials.password()).await?;
        let account = Account::new(username, password_hash);

        let outcome = self
            .within_timeout(self.store.insert_if_absent(&account))
            .await?;
        match outcome {
            InsertOutcome::Inserted => {
                info!("Registered account {username:?}");
                Ok(Registered {
                    username: account.username,
                })
            }
            InsertOutcome::AlreadyExists => {
                warn!("Registration lost race, username {username:?} already registered");
                Err(AuthError::DuplicateAccount)
            }
        }
    }

    pub async fn login(&self, credentials: Credentials) -> Result<Authenticated, AuthError> {
        let username = credentials.username();

        let (stored_hash, known) = match self.find(username).await? {
            Some(account) => (account.password_hash, true),
            None => (self.decoy_hash.to_string(), false),
        };

        let matches = self.verify(credentials.password(), stored_hash).await?;
        if known && matches {
            info!("Login succeeded for {username:?}");
            Ok(Authenticated {
                username: username.to_string(),
            })
        } else {
            warn!("Login failed for {username:?}");
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn find(&self, username: &str) -> Result<Option<Account>, AuthError> {
        self.within_timeout(self.store.find_by_username(username))
            .await
    }

    async fn within_timeout<T>(
        &self,
        op: impl Future<Output = anyhow::Result<T>>,
    ) -> Result<T, AuthError> {
        tokio::time::timeout(self.store_timeout, op)
            .await
            .map_err(|_| {
                AuthError::StoreUnavailable(anyhow!(
                    "store did not answer within {:?}",
                    self.store_timeout
                ))
            })?
            .map_err(AuthError::StoreUnavailable)
    }

    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(e.into()))?
            .map_err(|e| AuthError::Internal(e.into()))
    }

    async fn verify(&self, password: &str, hash: String) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(e.into()))?
            .map_err(|e| AuthError::Internal(e.into()))
    }
}
