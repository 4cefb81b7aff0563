use std::fmt;

use super::AuthError;

/// A username/password pair that passed shape validation: both present and
/// non-empty. Values are kept exactly as submitted.
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Result<Self, AuthError> {
        match (username, password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Ok(Self { username, password })
            }
            _ => Err(AuthError::MissingField),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_valid() {
        let creds = Credentials::new(some("alice"), some("secret123")).unwrap();
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password(), "secret123");
    }

    #[test]
    fn test_missing_or_empty() {
        for (username, password) in [
            (None, some("pw")),
            (some("alice"), None),
            (None, None),
            (some(""), some("pw")),
            (some("alice"), some("")),
            (some(""), some("")),
        ] {
            assert!(matches!(
                Credentials::new(username, password),
                Err(AuthError::MissingField)
            ));
        }
    }

    #[test]
    fn test_not_trimmed() {
        let creds = Credentials::new(some(" alice "), some(" ")).unwrap();
        assert_eq!(creds.username(), " alice ");
        assert_eq!(creds.password(), " ");
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::new(some("alice"), some("secret123")).unwrap();
        assert!(!format!("{creds:?}").contains("secret123"));
    }
}
