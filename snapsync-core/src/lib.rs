//! snapsync core library — domain types, config loading, errors.
//!
//! - [`types`] — node classification and path pairs
//! - [`error`] — [`ConfigError`]
//! - [`config`] — [`SyncConfig`] load / defaults

pub mod config;
pub mod error;
pub mod types;

pub use config::SyncConfig;
pub use error::ConfigError;
pub use types::{NodeKind, PathPair};
