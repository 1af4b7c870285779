//! Social-account settings facade.
//!
//! # Design
//! - Built once at startup and shared by reference; no global state.
//! - Every accessor resolves `SOCIALACCOUNT_<NAME>` through the injected
//!   [`ConfigProvider`] and falls back to a documented default.
//! - Account-level defaults arrive as [`AccountDefaults`] at construction.
//! - The migrated `PROVIDERS` mapping is computed on first read and cached.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::account::{AccountDefaults, AccountSettings};
use crate::defaults::{DEFAULT_ADAPTER, OPENID_CONNECT, SOCIALACCOUNT_PREFIX, UID_MAX_LENGTH};
use crate::error::{ConfigError, ConfigResult};
use crate::migrate::{is_legacy_shape, migrate_openid_connect};
use crate::model::{EmailVerificationMethod, ProviderApp, SocialAccountSnapshot};
use crate::source::ConfigProvider;

const SECTION: &str = "socialaccount";

/// Read access to social-account settings.
pub trait SettingsFacade: Send + Sync {
    /// Whether the provider is asked for the user's email address.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a boolean.
    fn query_email(&self) -> ConfigResult<bool>;
    /// Whether signup may bypass the signup form using provider data.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a boolean.
    fn auto_signup(&self) -> ConfigResult<bool>;
    /// Provider-specific settings in the current layout.
    ///
    /// # Errors
    ///
    /// Returns an error when the mapping is malformed or a legacy
    /// `openid_connect` entry cannot be migrated.
    fn providers(&self) -> ConfigResult<&Map<String, Value>>;
    /// Whether an email address is required at signup.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a boolean.
    fn email_required(&self) -> ConfigResult<bool>;
    /// Email verification method applied to social signups.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a known method.
    fn email_verification(&self) -> ConfigResult<EmailVerificationMethod>;
    /// Adapter class path.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a string.
    fn adapter(&self) -> ConfigResult<String>;
    /// Form overrides keyed by form name.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a string mapping.
    fn forms(&self) -> ConfigResult<BTreeMap<String, String>>;
    /// Whether login may be triggered by a GET request.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a boolean.
    fn login_on_get(&self) -> ConfigResult<bool>;
    /// Whether provider tokens are persisted.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a boolean.
    fn store_tokens(&self) -> ConfigResult<bool>;
    /// Maximum length of a provider-issued account UID.
    fn uid_max_length(&self) -> usize;
    /// Optional display template for social accounts.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is neither a string nor null.
    fn socialaccount_str(&self) -> ConfigResult<Option<String>>;
}

/// Settings facade over the `SOCIALACCOUNT_*` namespace.
pub struct SocialAccountSettings {
    provider: Arc<dyn ConfigProvider>,
    account: AccountDefaults,
    providers: OnceCell<Map<String, Value>>,
}

impl SocialAccountSettings {
    /// Bind the facade to a configuration source and resolved account defaults.
    #[must_use]
    pub const fn new(provider: Arc<dyn ConfigProvider>, account: AccountDefaults) -> Self {
        Self {
            provider,
            account,
            providers: OnceCell::new(),
        }
    }

    /// Resolve account defaults from `provider` and bind the facade to it.
    ///
    /// # Errors
    ///
    /// Returns an error when the account settings cannot be resolved.
    pub fn from_provider(provider: Arc<dyn ConfigProvider>) -> ConfigResult<Self> {
        let account = AccountSettings::new(Arc::clone(&provider)).defaults()?;
        Ok(Self::new(provider, account))
    }

    /// Look up `SOCIALACCOUNT_<name>`, returning `default` when unset.
    #[must_use]
    pub fn resolve(&self, name: &str, default: Value) -> Value {
        self.provider
            .get(&format!("{SOCIALACCOUNT_PREFIX}{name}"), default)
    }

    /// Typed variant of [`Self::resolve`]; `default` is used when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when the stored value cannot be
    /// decoded as `T`.
    pub fn resolve_as<T, D>(&self, name: &str, default: &D) -> ConfigResult<T>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let fallback = serde_json::to_value(default).map_err(|_| ConfigError::InvalidField {
            section: SECTION.to_string(),
            field: name.to_string(),
            value: None,
            reason: "default is not representable as a setting",
        })?;
        let value = self.resolve(name, fallback);
        T::deserialize(&value).map_err(|_| ConfigError::InvalidField {
            section: SECTION.to_string(),
            field: name.to_string(),
            value: Some(value.to_string()),
            reason: "unexpected value type",
        })
    }

    /// Settings for a single provider, after migration.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`SettingsFacade::providers`].
    pub fn provider_settings(&self, provider_id: &str) -> ConfigResult<Option<&Value>> {
        Ok(self.providers()?.get(provider_id))
    }

    /// Configured `openid_connect` apps as typed records.
    ///
    /// # Errors
    ///
    /// Returns an error when the provider settings cannot be migrated or an
    /// app entry cannot be decoded.
    pub fn openid_connect_apps(&self) -> ConfigResult<Vec<ProviderApp>> {
        let Some(apps) = self
            .provider_settings(OPENID_CONNECT)?
            .and_then(|entry| entry.get("APPS"))
        else {
            return Ok(Vec::new());
        };
        Vec::<ProviderApp>::deserialize(apps).map_err(|_| ConfigError::InvalidField {
            section: format!("{SECTION}.PROVIDERS.{OPENID_CONNECT}"),
            field: "APPS".to_string(),
            value: Some(apps.to_string()),
            reason: "must be a list of app objects",
        })
    }

    /// Resolve every setting into a serializable snapshot.
    ///
    /// # Errors
    ///
    /// Propagates the first accessor error encountered.
    pub fn snapshot(&self) -> ConfigResult<SocialAccountSnapshot> {
        let snapshot = SocialAccountSnapshot {
            query_email: self.query_email()?,
            auto_signup: self.auto_signup()?,
            providers: self.providers()?.clone(),
            email_required: self.email_required()?,
            email_verification: self.email_verification()?,
            adapter: self.adapter()?,
            forms: self.forms()?,
            login_on_get: self.login_on_get()?,
            store_tokens: self.store_tokens()?,
            uid_max_length: self.uid_max_length(),
            socialaccount_str: self.socialaccount_str()?,
        };
        info!(
            providers = snapshot.providers.len(),
            auto_signup = snapshot.auto_signup,
            email_verification = %snapshot.email_verification,
            adapter = %snapshot.adapter,
            "resolved social account settings"
        );
        Ok(snapshot)
    }

    fn load_providers(&self) -> ConfigResult<Map<String, Value>> {
        let mut providers: Map<String, Value> = self.resolve_as("PROVIDERS", &Map::new())?;
        if let Some(entry) = providers.get_mut(OPENID_CONNECT) {
            if is_legacy_shape(entry) {
                warn!(
                    provider = OPENID_CONNECT,
                    "provider settings use the deprecated SERVERS layout; migrating to APPS"
                );
            }
            *entry = migrate_openid_connect(entry)?;
            let apps = entry
                .get("APPS")
                .and_then(serde_json::Value::as_array)
                .map_or(0, Vec::len);
            debug!(provider = OPENID_CONNECT, apps, "provider settings ready");
        }
        Ok(providers)
    }
}

impl SettingsFacade for SocialAccountSettings {
    fn query_email(&self) -> ConfigResult<bool> {
        self.resolve_as("QUERY_EMAIL", &self.account.email_required)
    }

    fn auto_signup(&self) -> ConfigResult<bool> {
        self.resolve_as("AUTO_SIGNUP", &true)
    }

    fn providers(&self) -> ConfigResult<&Map<String, Value>> {
        self.providers.get_or_try_init(|| self.load_providers())
    }

    fn email_required(&self) -> ConfigResult<bool> {
        self.resolve_as("EMAIL_REQUIRED", &self.account.email_required)
    }

    fn email_verification(&self) -> ConfigResult<EmailVerificationMethod> {
        self.resolve_as("EMAIL_VERIFICATION", &self.account.email_verification)
    }

    fn adapter(&self) -> ConfigResult<String> {
        self.resolve_as("ADAPTER", DEFAULT_ADAPTER)
    }

    fn forms(&self) -> ConfigResult<BTreeMap<String, String>> {
        self.resolve_as("FORMS", &Map::new())
    }

    fn login_on_get(&self) -> ConfigResult<bool> {
        self.resolve_as("LOGIN_ON_GET", &false)
    }

    fn store_tokens(&self) -> ConfigResult<bool> {
        self.resolve_as("STORE_TOKENS", &false)
    }

    fn uid_max_length(&self) -> usize {
        UID_MAX_LENGTH
    }

    fn socialaccount_str(&self) -> ConfigResult<Option<String>> {
        self.resolve_as("SOCIALACCOUNT_STR", &Value::Null)
    }
}
