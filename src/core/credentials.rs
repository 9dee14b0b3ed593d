use std::error::Error as StdError;
use std::fmt;

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// The variable is unset or empty.
    Missing { var: &'static str },
    /// The variable is set but not valid unicode.
    NotUnicode { var: &'static str },
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Missing { var } => write!(
                f,
                "❌ {var} is not set\n\n\
                 Export your API key before starting:\n  \
                 export {var}=\"your-api-key-here\"\n\
                 or put {var}=... in a .env file in the current directory."
            ),
            CredentialError::NotUnicode { var } => {
                write!(f, "❌ {var} contains invalid unicode")
            }
        }
    }
}

impl StdError for CredentialError {}

/// The API key, read once at startup.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Load `.env` (if present) and read the key from the environment.
    pub fn from_env() -> Result<Self, CredentialError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!("ignoring unreadable .env file: {err}");
            }
        }
        Self::from_lookup(API_KEY_ENV, |var| std::env::var(var))
    }

    fn from_lookup<F>(var: &'static str, lookup: F) -> Result<Self, CredentialError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        match lookup(var) {
            Ok(value) if !value.trim().is_empty() => Ok(Self {
                api_key: value.trim().to_string(),
            }),
            Ok(_) | Err(std::env::VarError::NotPresent) => Err(CredentialError::Missing { var }),
            Err(std::env::VarError::NotUnicode(_)) => Err(CredentialError::NotUnicode { var }),
        }
    }

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::VarError;

    #[test]
    fn reads_and_trims_key() {
        let creds = Credentials::from_lookup(API_KEY_ENV, |_| Ok("  abc123\n".to_string()))
            .expect("key present");
        assert_eq!(creds.api_key(), "abc123");
    }

    #[test]
    fn missing_or_blank_key_is_an_error() {
        let missing = Credentials::from_lookup(API_KEY_ENV, |_| Err(VarError::NotPresent));
        assert_eq!(
            missing.unwrap_err(),
            CredentialError::Missing { var: API_KEY_ENV }
        );

        let blank = Credentials::from_lookup(API_KEY_ENV, |_| Ok("   ".to_string()));
        assert!(matches!(blank, Err(CredentialError::Missing { .. })));
    }

    #[test]
    fn debug_output_redacts_key() {
        let creds = Credentials::new("secret");
        assert!(!format!("{creds:?}").contains("secret"));
    }
}
