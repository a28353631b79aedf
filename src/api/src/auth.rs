//! Credentials and Basic authorization for the racing API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::config::ApiConfig;

/// Missing or unusable credentials
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("Missing API credentials: set RACING_API_USERNAME (api.username in config)")]
    MissingUsername,

    #[error("Missing API credentials: set RACING_API_PASSWORD (api.password in config)")]
    MissingPassword,
}

/// Username/password pair for the racing API
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read the pair from configuration. Blank values count as missing.
    pub fn from_config(api: &ApiConfig) -> Result<Self, CredentialsError> {
        let username = present(api.username.as_deref()).ok_or(CredentialsError::MissingUsername)?;
        let password = present(api.password.as_deref()).ok_or(CredentialsError::MissingPassword)?;
        Ok(Self::new(username, password))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// `Authorization` header value: `Basic base64(user:pass)`
    pub fn authorization_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {}", token)
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
