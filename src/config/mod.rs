//! Configuration module for Pocketbook
//!
//! - Path resolution (env override, XDG default)
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::PocketbookPaths;
pub use settings::{ImportSettings, MalformedRowPolicy, Settings};
