use std::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Bearer token of the signed-in console user.
///
/// The token is never looked up from ambient storage; callers pass it to
/// every port that talks to the ITSM service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken(String);

impl AccessToken {
    /// Creates a token from its raw value.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_owned();
        if value.is_empty() {
            return Err(AppError::Unauthorized(
                "access token must not be empty".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Extracts the token from an `Authorization` header value.
    pub fn from_authorization_header(header_value: &str) -> AppResult<Self> {
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("No autorizado".to_owned()))?;

        Self::new(token)
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl Debug for AccessToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("AccessToken(<redacted>)")
    }
}
