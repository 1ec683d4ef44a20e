//! Configuration for the Lathe refactoring engine.
//!
//! Settings come from a `lathe.toml` file:
//!
//! ```toml
//! [refactorings]
//! disabled = ["remove-braces"]
//! failure_policy = "swallow"
//! prefix_field_identifier_with_underscore = true
//!
//! [logging]
//! level = "info"
//! json = false
//! ```
//!
//! The config is plain data handed to the engine per call; nothing here is
//! global except the tracing subscriber installed by [`init_tracing`].

mod diagnostics;
mod ids;
mod schema;

use std::collections::BTreeSet;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use diagnostics::{ConfigDiagnostics, ConfigWarning};
pub use ids::{RefactoringId, UnknownRefactoringId};
pub use schema::{json_schema, json_schema_string};

/// File name looked up by [`discover_config_path`].
pub const CONFIG_FILE_NAME: &str = "lathe.toml";

/// What the outermost dispatch boundary does with a defect (an error or
/// panic escaping a refactoring).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Propagate the error and resume panics. Meant for development and tests.
    FailFast,
    /// Log the defect and report "no refactorings".
    #[default]
    Swallow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct RefactoringsConfig {
    /// Refactorings that are never offered.
    #[serde(default)]
    pub disabled: BTreeSet<RefactoringId>,

    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Name backing fields `_value` instead of `value`.
    #[serde(default = "RefactoringsConfig::default_prefix_field_identifier_with_underscore")]
    pub prefix_field_identifier_with_underscore: bool,
}

impl RefactoringsConfig {
    fn default_prefix_field_identifier_with_underscore() -> bool {
        true
    }

    /// Everything enabled, defects propagate.
    pub fn fail_fast() -> Self {
        Self {
            failure_policy: FailurePolicy::FailFast,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_enabled(&self, id: RefactoringId) -> bool {
        !self.disabled.contains(&id)
    }

    pub fn disable(&mut self, id: RefactoringId) -> &mut Self {
        self.disabled.insert(id);
        self
    }

    /// Enabled refactorings in registry order.
    pub fn enabled(&self) -> impl Iterator<Item = RefactoringId> + '_ {
        RefactoringId::ALL.iter().copied().filter(|id| self.is_enabled(*id))
    }
}

impl Default for RefactoringsConfig {
    fn default() -> Self {
        Self {
            disabled: BTreeSet::new(),
            failure_policy: FailurePolicy::default(),
            prefix_field_identifier_with_underscore: Self::default_prefix_field_identifier_with_underscore(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// The effective filter: the configured level with `RUST_LOG` merged in.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());
        let config_directives = Self::normalize_level_directives(&self.level);
        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct LatheConfig {
    #[serde(default)]
    pub refactorings: RefactoringsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` embeds a source snippet; keep only the message.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl LatheConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_from_path_with_diagnostics(path).map(|(config, _)| config)
    }

    /// Load a config file and report unknown keys and recoverable problems.
    pub fn load_from_path_with_diagnostics(
        path: impl AsRef<Path>,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str_with_diagnostics(&text)
    }

    pub fn load_from_str_with_diagnostics(
        text: &str,
    ) -> Result<(Self, ConfigDiagnostics), ConfigError> {
        let (config, unknown_keys) =
            diagnostics::deserialize_toml_with_unknown_keys::<LatheConfig>(text)?;
        let mut diagnostics = ConfigDiagnostics {
            unknown_keys,
            ..ConfigDiagnostics::default()
        };
        if let Ok(value) = toml::from_str::<toml::Value>(text) {
            diagnostics.warnings.extend(duplicate_disabled_ids(&value));
        }
        if tracing_subscriber::EnvFilter::try_new(LoggingConfig::normalize_level_directives(
            &config.logging.level,
        ))
        .is_err()
        {
            diagnostics.warnings.push(ConfigWarning::LoggingLevelInvalid {
                value: config.logging.level.clone(),
            });
        }
        for key in &diagnostics.unknown_keys {
            tracing::warn!(target: "lathe.config", key = %key, "unknown config key");
        }
        Ok((config, diagnostics))
    }
}

fn duplicate_disabled_ids(value: &toml::Value) -> Vec<ConfigWarning> {
    let Some(ids) = value
        .get("refactorings")
        .and_then(|r| r.get("disabled"))
        .and_then(|d| d.as_array())
    else {
        return Vec::new();
    };
    let mut seen = BTreeSet::new();
    let mut warned = BTreeSet::new();
    ids.iter()
        .filter_map(|id| id.as_str())
        .filter(|id| !seen.insert(*id) && warned.insert(*id))
        .map(|id| ConfigWarning::DuplicateDisabledId { id: id.to_owned() })
        .collect()
}

/// `lathe.toml` in `root`, if present.
pub fn discover_config_path(root: &Path) -> Option<std::path::PathBuf> {
    let candidate = root.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Load `lathe.toml` from `root`, falling back to defaults when there is none.
pub fn load_for_workspace(root: &Path) -> Result<(LatheConfig, ConfigDiagnostics), ConfigError> {
    match discover_config_path(root) {
        Some(path) => LatheConfig::load_from_path_with_diagnostics(path),
        None => Ok((LatheConfig::default(), ConfigDiagnostics::default())),
    }
}

/// Install a global `tracing` subscriber writing to stderr.
///
/// Returns `false` if a subscriber was already installed (the existing one is kept).
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let registry = tracing_subscriber::registry().with(config.env_filter());
    let result = if config.json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_synonyms_normalize() {
        assert_eq!(LoggingConfig::normalize_level_directives(" WARNING "), "warn");
        assert_eq!(LoggingConfig::normalize_level_directives(""), "info");
        assert_eq!(
            LoggingConfig::normalize_level_directives("lathe.refactor=trace"),
            "lathe.refactor=trace"
        );
    }

    #[test]
    fn disabled_ids_short_circuit() {
        let mut config = RefactoringsConfig::default();
        assert!(config.is_enabled(RefactoringId::RemoveBraces));
        config.disable(RefactoringId::RemoveBraces);
        assert!(!config.is_enabled(RefactoringId::RemoveBraces));
        assert_eq!(config.enabled().count(), RefactoringId::ALL.len() - 1);
    }
}
