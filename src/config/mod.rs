//! Configuration model for review-intake.
//!
//! This module defines the Config struct that represents `review-intake.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! defaults for every field, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::UploadSettings;

/// File name looked up in the current directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "review-intake.yaml";

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "REVIEW_INTAKE_CONFIG";
