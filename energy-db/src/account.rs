use std::{fmt, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    db::CredentialDatabase,
    document::{self, Inserted},
};

const COLLECTION: &str = "users";

/// A registered user. Records are written once and never updated.
#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<Account>>;

    /// Atomically inserts `account` unless its username is taken. Never
    /// overwrites an existing record.
    async fn insert_if_absent(&self, account: &Account) -> anyhow::Result<InsertOutcome>;
}

pub struct TursoAccountStore {
    db: Arc<CredentialDatabase>,
    // turso admits one writer at a time; queue this process's inserts here
    // instead of surfacing busy errors. The unique index still decides.
    write_gate: Mutex<()>,
}

impl TursoAccountStore {
    pub fn new(db: Arc<CredentialDatabase>) -> Self {
        Self {
            db,
            write_gate: Mutex::new(()),
        }
    }

    pub async fn count_by_username(&self, username: &str) -> anyhow::Result<i64> {
        let conn = self.db.connect()?;
        document::count(COLLECTION, username, &conn).await
    }
}

#[async_trait]
impl AccountStore for TursoAccountStore {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<Account>> {
        let conn = self.db.connect()?;
        let Some(doc) = document::find_one(COLLECTION, username, &conn).await? else {
            return Ok(None);
        };
        let account: Account = serde_json::from_str(&doc.body)?;
        Ok(Some(account))
    }

    async fn insert_if_absent(&self, account: &Account) -> anyhow::Result<InsertOutcome> {
        let body = serde_json::to_string(account)?;

        let _guard = self.write_gate.lock().await;
        let conn = self.db.connect()?;
        match document::insert_one(COLLECTION, &account.username, &body, &conn).await? {
            Inserted::Created(_) => Ok(InsertOutcome::Inserted),
            Inserted::Conflict => Ok(InsertOutcome::AlreadyExists),
        }
    }
}
