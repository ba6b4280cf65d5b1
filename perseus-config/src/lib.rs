//! Shared configuration loader for the perseus toolchain.
//!
//! `defaults/perseus.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user files
//! on top of those defaults via [`Loader`] before deserializing into
//! [`PerseusConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use perseus_core::types::ApiOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/perseus.default.toml");

/// Top-level configuration consumed by perseus applications.
#[derive(Debug, Clone, Deserialize)]
pub struct PerseusConfig {
    pub renderer: RendererConfig,
    pub api: ApiConfig,
    pub viewer: ViewerConfig,
    pub cli: CliConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    pub always_update: bool,
    pub highlight_lint: bool,
}

/// Host-environment switches, mirrored into [`ApiOptions`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub is_mobile: bool,
    pub read_only: bool,
    pub custom_keypad: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    pub show_score_panel: bool,
    pub show_examples: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    pub pretty_json: bool,
}

impl ApiConfig {
    pub fn to_api_options(&self) -> ApiOptions {
        ApiOptions {
            is_mobile: self.is_mobile,
            read_only: self.read_only,
            custom_keypad: self.custom_keypad,
            ..ApiOptions::default()
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<PerseusConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PerseusConfig, ConfigError> {
    Loader::new().build()
}
