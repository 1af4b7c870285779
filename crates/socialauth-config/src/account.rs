//! Account settings consulted for social-account defaults.

use std::sync::Arc;

use serde_json::Value;

use crate::defaults::ACCOUNT_PREFIX;
use crate::error::{ConfigError, ConfigResult};
use crate::model::EmailVerificationMethod;
use crate::source::ConfigProvider;

/// Resolved account values that seed social-account defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountDefaults {
    /// Whether users must supply an email address at signup.
    pub email_required: bool,
    /// Email verification method applied at signup.
    pub email_verification: EmailVerificationMethod,
}

/// Facade over the `ACCOUNT_*` settings namespace.
#[derive(Clone)]
pub struct AccountSettings {
    provider: Arc<dyn ConfigProvider>,
}

impl AccountSettings {
    /// Bind the facade to a configuration source.
    #[must_use]
    pub const fn new(provider: Arc<dyn ConfigProvider>) -> Self {
        Self { provider }
    }

    fn setting(&self, name: &str, default: Value) -> Value {
        self.provider.get(&format!("{ACCOUNT_PREFIX}{name}"), default)
    }

    /// Whether users must supply an email address at signup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when the setting is not a boolean.
    pub fn email_required(&self) -> ConfigResult<bool> {
        let value = self.setting("EMAIL_REQUIRED", Value::Bool(false));
        value.as_bool().ok_or_else(|| ConfigError::InvalidField {
            section: "account".to_string(),
            field: "EMAIL_REQUIRED".to_string(),
            value: Some(value.to_string()),
            reason: "must be a boolean",
        })
    }

    /// Email verification method applied at signup.
    ///
    /// # Errors
    ///
    /// Returns an error when the setting is not one of `mandatory`,
    /// `optional` or `none`.
    pub fn email_verification(&self) -> ConfigResult<EmailVerificationMethod> {
        let default = EmailVerificationMethod::default();
        match self.setting("EMAIL_VERIFICATION", Value::from(default.as_str())) {
            Value::String(method) => method.parse(),
            other => Err(ConfigError::InvalidVerificationMethod {
                value: other.to_string(),
            }),
        }
    }

    /// Resolve every value the social-account facade defaults to.
    ///
    /// # Errors
    ///
    /// Propagates any error from the individual accessors.
    pub fn defaults(&self) -> ConfigResult<AccountDefaults> {
        Ok(AccountDefaults {
            email_required: self.email_required()?,
            email_verification: self.email_verification()?,
        })
    }
}
