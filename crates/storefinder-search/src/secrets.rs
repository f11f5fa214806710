//! Access-token resolution.

use storefinder_core::{AccessToken, ConfigError};

/// Environment variable read by [`EnvSecretProvider::default`].
pub const MAPBOX_TOKEN_VAR: &str = "MAPBOX_TOKEN";

/// Supplies the upstream access token at the start of each search.
pub trait SecretProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when no usable token exists.
    fn access_token(&self) -> Result<AccessToken, ConfigError>;
}

/// Reads the token from an environment variable on every call, so a
/// rotated token is picked up without a restart.
#[derive(Debug, Clone)]
pub struct EnvSecretProvider {
    var: String,
}

impl EnvSecretProvider {
    #[must_use]
    pub fn new(var: &str) -> Self {
        Self {
            var: var.to_string(),
        }
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new(MAPBOX_TOKEN_VAR)
    }
}

impl SecretProvider for EnvSecretProvider {
    fn access_token(&self) -> Result<AccessToken, ConfigError> {
        std::env::var(&self.var)
            .ok()
            .as_deref()
            .and_then(AccessToken::new)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.var.clone()))
    }
}

/// Fixed token, or none at all. Used by tests and embedders.
#[derive(Debug, Clone)]
pub struct StaticSecretProvider {
    token: Option<AccessToken>,
}

impl StaticSecretProvider {
    /// A blank `raw` behaves like a missing token.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self {
            token: AccessToken::new(raw),
        }
    }

    #[must_use]
    pub fn missing() -> Self {
        Self { token: None }
    }
}

impl SecretProvider for StaticSecretProvider {
    fn access_token(&self) -> Result<AccessToken, ConfigError> {
        self.token
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar(MAPBOX_TOKEN_VAR.to_string()))
    }
}
