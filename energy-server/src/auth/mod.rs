//! Account registration and login.

mod credentials;
mod error;
mod service;

pub use credentials::Credentials;
pub use error::AuthError;
pub use service::{AuthService, Authenticated, Registered};
