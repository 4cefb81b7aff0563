//! Persistence for the energy predictor: an embedded document store holding
//! user accounts, plus the password hasher used to protect them.

pub mod account;
pub mod db;
pub mod document;
#[cfg(feature = "memory")]
pub mod memory;
pub mod migrations;
pub mod password;

pub use account::{Account, AccountStore, InsertOutcome, TursoAccountStore};
pub use db::CredentialDatabase;
pub use password::{PasswordError, PasswordHasher};
