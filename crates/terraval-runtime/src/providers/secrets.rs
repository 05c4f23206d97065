//! Secure credential handling for providers.
//!
//! Centralized, type-safe API credentials:
//!
//! - **No accidental logging**: credentials never appear in Debug output
//! - **Memory safety**: credentials are zeroed on drop
//! - **Explicit exposure**: the raw value requires a `.expose()` call at
//!   the point of use

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::ProviderError;

/// Where a credential was loaded from.
///
/// Useful for debugging configuration issues without exposing the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from the configuration file
    Config,
    /// Loaded from an environment variable
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    /// Wrap a credential value. After this point it cannot be accidentally
    /// logged or printed.
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load a credential from an environment variable.
    pub fn from_env(env_var: &str, name: &'static str) -> Result<Self, ProviderError> {
        std::env::var(env_var)
            .map(|v| Self::new(v, CredentialSource::Environment, name))
            .map_err(|_| {
                ProviderError::NotConfigured(format!(
                    "{} not set: configure '{}' environment variable",
                    name, env_var
                ))
            })
    }

    /// Use the configured value when present, else fall back to the
    /// environment variable.
    pub fn from_config_or_env(
        configured: Option<&str>,
        env_var: &str,
        name: &'static str,
    ) -> Result<Self, ProviderError> {
        match configured {
            Some(value) if !value.is_empty() => {
                Ok(Self::new(value, CredentialSource::Config, name))
            }
            _ => Self::from_env(env_var, name),
        }
    }

    /// Expose the raw credential. Call only at the point of use, e.g. when
    /// setting an HTTP header.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_is_redacted() {
        let cred = ApiCredential::new(
            "sk-super-secret-12345",
            CredentialSource::Programmatic,
            "test key",
        );
        let debug = format!("{:?}", cred);
        assert!(!debug.contains("sk-super-secret-12345"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_expose_returns_value() {
        let cred = ApiCredential::new("the-key", CredentialSource::Config, "test key");
        assert_eq!(cred.expose(), "the-key");
        assert!(!cred.is_empty());
    }

    #[test]
    fn test_missing_env_is_not_configured() {
        let result = ApiCredential::from_env("TERRAVAL_TEST_MISSING_KEY_XYZ", "test key");
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[test]
    fn test_config_value_wins_over_env() {
        let cred = ApiCredential::from_config_or_env(
            Some("from-config"),
            "TERRAVAL_TEST_MISSING_KEY_XYZ",
            "test key",
        )
        .unwrap();
        assert_eq!(cred.expose(), "from-config");
        assert_eq!(cred.source(), CredentialSource::Config);
    }

    #[test]
    fn test_empty_config_value_falls_through() {
        let result = ApiCredential::from_config_or_env(
            Some(""),
            "TERRAVAL_TEST_MISSING_KEY_XYZ",
            "test key",
        );
        assert!(result.is_err());
    }
}
