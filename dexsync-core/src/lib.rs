//! dexsync core library — domain types, settings, errors.
//!
//! - [`types`] — entries, names, languages, database rows
//! - [`config`] — [`Settings`] read from the environment
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{RepoTarget, Settings};
pub use error::ConfigError;
pub use types::{
    sort_by_dex, DexNumber, DexRecord, DexSlot, Entry, Language, LocalizedName, Names,
    PublishedEntry,
};
