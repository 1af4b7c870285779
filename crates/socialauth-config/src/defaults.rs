//! Key prefixes and default values for the settings facades.
//!
//! # Design
//! - Centralize prefixes so both facades read the same namespace conventions.
//! - Keep fixed defaults explicit for auditability.

/// Prefix applied to every social-account setting key.
pub const SOCIALACCOUNT_PREFIX: &str = "SOCIALACCOUNT_";
/// Prefix applied to every account setting key.
pub const ACCOUNT_PREFIX: &str = "ACCOUNT_";
/// Adapter used when `SOCIALACCOUNT_ADAPTER` is not configured.
pub const DEFAULT_ADAPTER: &str = "allauth.socialaccount.adapter.DefaultSocialAccountAdapter";
/// Maximum length of a provider-issued account UID.
pub const UID_MAX_LENGTH: usize = 191;
/// Provider entry that may still use the legacy `SERVERS` layout.
pub const OPENID_CONNECT: &str = "openid_connect";
