use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Username and password are required")]
    MissingField,

    #[error("Username already registered")]
    DuplicateAccount,

    /// Same error for an unknown username and a wrong password.
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Credential store unavailable: {0:#}")]
    StoreUnavailable(anyhow::Error),

    #[error("Internal error: {0:#}")]
    Internal(anyhow::Error),
}
