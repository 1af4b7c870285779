#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Settings facade for social-account authentication.
//!
//! Layout: `source.rs` (`ConfigProvider` and its backends), `account.rs`
//! (account-level defaults), `service.rs` (`SocialAccountSettings`),
//! `migrate.rs` (legacy provider layout migration), `model.rs` (typed values).

pub mod account;
pub mod defaults;
pub mod error;
pub mod migrate;
pub mod model;
pub mod service;
pub mod source;

pub use account::{AccountDefaults, AccountSettings};
pub use error::{ConfigError, ConfigResult};
pub use migrate::{is_legacy_shape, migrate_openid_connect};
pub use model::{EmailVerificationMethod, ProviderApp, SocialAccountSnapshot};
pub use service::{SettingsFacade, SocialAccountSettings};
pub use source::{ConfigProvider, EnvSettings, GetterOverride, SettingsMap};
