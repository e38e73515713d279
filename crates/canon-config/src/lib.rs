//! Configuration for Canon analysis runs (`canon.toml`).

use std::path::Path;
use std::sync::OnceLock;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod logging;
mod schema;

pub use logging::{init_tracing, LogBuffer};
pub use schema::json_schema;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct CanonConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Knobs for the member-normalization pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Worker threads for batch analysis. Unset uses rayon's default.
    #[serde(default)]
    #[schemars(range(min = 1))]
    pub threads: Option<usize>,

    /// Fold compiler-generated bridge methods into the method they forward to
    /// instead of listing them as overloads of their own.
    #[serde(default = "AnalysisConfig::default_fold_bridge_methods")]
    pub fold_bridge_methods: bool,

    /// Accept `java.lang.Boolean isX()` as a getter. JavaBeans only accepts
    /// primitive `boolean` for the `is` prefix.
    #[serde(default)]
    pub boxed_boolean_is_getter: bool,

    /// Consider static methods for accessor/mutator synthesis.
    #[serde(default)]
    pub static_accessors: bool,
}

impl AnalysisConfig {
    fn default_fold_bridge_methods() -> bool {
        true
    }

    /// Worker count to request from rayon, if any.
    pub fn worker_threads(&self) -> Option<usize> {
        self.threads.filter(|threads| *threads > 0)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threads: None,
            fold_bridge_methods: Self::default_fold_bridge_methods(),
            boxed_boolean_is_getter: false,
            static_accessors: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all Canon crates: a simple level (`info`, `debug`,
    /// ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Mirror logs to stderr (in addition to the in-memory buffer).
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,

    /// Number of log lines kept in memory.
    #[serde(default = "LoggingConfig::default_buffer_lines")]
    #[schemars(range(min = 1))]
    pub buffer_lines: usize,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    fn default_buffer_lines() -> usize {
        1_000
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
            // Anything else is treated as an `EnvFilter` directive string.
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

    /// Effective filter: the configured level merged with `RUST_LOG`, if set.
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
            stderr: Self::default_stderr(),
            buffer_lines: Self::default_buffer_lines(),
        }
    }
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
        // The default `Display` includes a snippet of the input; keep only the
        // message, with user-provided scalars redacted.
        ConfigError::Toml(sanitize_toml_error_message(err.message()))
    }
}

fn sanitize_toml_error_message(message: &str) -> String {
    static QUOTED_STRING_RE: OnceLock<Option<regex::Regex>> = OnceLock::new();
    let re = QUOTED_STRING_RE.get_or_init(|| regex::Regex::new(r#""(?:\\.|[^"\\])*""#).ok());
    let mut out = match re {
        Some(re) => re.replace_all(message, r#""<redacted>""#).into_owned(),
        None => message.to_owned(),
    };

    // `invalid type: integer `123`, expected ...` echoes the offending value
    // between backticks before `, expected`.
    if out.contains("invalid type:") || out.contains("invalid value:") {
        let boundary = out.find(", expected").unwrap_or(out.len());
        if let Some(start) = out[..boundary].find('`') {
            if let Some(end_rel) = out[start + 1..boundary].rfind('`') {
                out.replace_range(start + 1..start + 1 + end_rel, "<redacted>");
            }
        }
    }

    out
}

impl CanonConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: CanonConfig = toml::from_str(text)?;
        config.normalize();
        Ok(config)
    }

    fn normalize(&mut self) {
        if self.analysis.threads == Some(0) {
            tracing::warn!(
                target: "canon.config",
                "ignoring analysis.threads = 0 (must be >= 1); using the default pool size"
            );
            self.analysis.threads = None;
        }
        if self.logging.buffer_lines == 0 {
            tracing::warn!(
                target: "canon.config",
                "ignoring logging.buffer_lines = 0 (must be >= 1)"
            );
            self.logging.buffer_lines = LoggingConfig::default_buffer_lines();
        }
    }
}
