//! Typed settings models.
//!
//! # Design
//! - Pure data carriers returned by the facades.
//! - Keeps domain types separate from lookup and migration code.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// How strictly email addresses must be verified before login.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum EmailVerificationMethod {
    /// Login is refused until the address is verified.
    Mandatory,
    /// A verification mail is sent but login is still allowed.
    #[default]
    Optional,
    /// No verification mail is sent.
    None,
}

impl EmailVerificationMethod {
    /// Render the method as its lowercase string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mandatory => "mandatory",
            Self::Optional => "optional",
            Self::None => "none",
        }
    }
}

impl FromStr for EmailVerificationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mandatory" => Ok(Self::Mandatory),
            "optional" => Ok(Self::Optional),
            "none" => Ok(Self::None),
            _ => Err(ConfigError::InvalidVerificationMethod {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for EmailVerificationMethod {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for EmailVerificationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured application of a provider, in the current `APPS` layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderApp {
    /// Identifier under which the app is exposed (e.g. the OIDC server id).
    pub provider_id: String,
    /// Human-readable name; empty when not configured.
    #[serde(default)]
    pub name: String,
    /// OAuth client identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// OAuth client secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// Optional provider key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Provider-specific settings (`server_url`, `token_auth_method`, ...).
    #[serde(default)]
    pub settings: Map<String, Value>,
    /// Any other keys carried over from the app definition.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProviderApp {
    /// Base URL of the identity server, when configured.
    #[must_use]
    pub fn server_url(&self) -> Option<&str> {
        self.settings.get("server_url").and_then(Value::as_str)
    }

    /// Client authentication method at the token endpoint, when configured.
    #[must_use]
    pub fn token_auth_method(&self) -> Option<&str> {
        self.settings.get("token_auth_method").and_then(Value::as_str)
    }
}

/// Point-in-time view of every resolved social-account setting.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SocialAccountSnapshot {
    /// Whether the provider is asked for the user's email address.
    pub query_email: bool,
    /// Whether signup may bypass the signup form.
    pub auto_signup: bool,
    /// Provider settings after migration to the current layout.
    pub providers: Map<String, Value>,
    /// Whether an email address is required at signup.
    pub email_required: bool,
    /// Email verification method applied to social signups.
    pub email_verification: EmailVerificationMethod,
    /// Adapter class path.
    pub adapter: String,
    /// Form overrides keyed by form name.
    pub forms: BTreeMap<String, String>,
    /// Whether login may be triggered by a GET request.
    pub login_on_get: bool,
    /// Whether provider tokens are persisted.
    pub store_tokens: bool,
    /// Maximum account UID length.
    pub uid_max_length: usize,
    /// Optional display template for social accounts.
    pub socialaccount_str: Option<String>,
}
