//! Account store kept entirely in process memory. Nothing survives a restart.

use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Mutex,
};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::account::{Account, AccountStore, InsertOutcome};

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().map(|a| a.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<Account>> {
        let accounts = self
            .accounts
            .lock()
            .map_err(|_| anyhow!("account map poisoned"))?;
        Ok(accounts.get(username).cloned())
    }

    async fn insert_if_absent(&self, account: &Account) -> anyhow::Result<InsertOutcome> {
        let mut accounts = self
            .accounts
            .lock()
            .map_err(|_| anyhow!("account map poisoned"))?;
        match accounts.entry(account.username.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(account.clone());
                Ok(InsertOutcome::Inserted)
            }
        }
    }
}
