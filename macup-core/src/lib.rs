//! macup core library — domain types, the tool whitelist, config persistence.
//!
//! - [`types`] — [`Tool`], [`Whitelist`]
//! - [`error`] — [`ConfigError`]
//! - [`config`] — load / save of the persisted selection

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, ConfigStore};
pub use error::ConfigError;
pub use types::{Tool, Whitelist};
