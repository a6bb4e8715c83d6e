use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Provider-assigned user identifier (opaque string).
///
/// The gate never interprets it; it is passed through to handlers as-is.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into,
)]
#[serde(transparent)]
pub struct UserId(pub String);

/// Identity resolved by the identity provider for the current request.
///
/// Issued and expiry timestamps belong to the provider; they are carried for
/// display and logging only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Identity {
    #[serde(rename = "id")]
    pub user_id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<time::OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_sign_in_at: Option<time::OffsetDateTime>,
}

impl Identity {
    /// Create an `Identity` with only the required user id.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            email: None,
            created_at: None,
            last_sign_in_at: None,
        }
    }

    /// Set the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the account creation time.
    #[must_use]
    pub fn with_created_at(mut self, at: time::OffsetDateTime) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Set the last sign-in time.
    #[must_use]
    pub fn with_last_sign_in_at(mut self, at: time::OffsetDateTime) -> Self {
        self.last_sign_in_at = Some(at);
        self
    }
}
