//! Hybrid attribute settings.
//!
//! [`HybridConfig`] can be loaded from `config/config.toml` (section
//! `[hybrid]`) or from `LIFEGUARD__HYBRID__*` environment variables using
//! `HybridConfig::load()`. The process-wide settings are installed once with
//! [`init`] and read with [`current`]; without `init`, defaults apply.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::error::HybridError;

static CONFIG: OnceCell<HybridConfig> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HybridConfig {
    /// Name published for a hybrid that is not registered on its owning class
    #[serde(default = "default_unknown_attribute_key")]
    pub unknown_attribute_key: String,
    /// How many `HasClauseElement` indirections the adapter follows
    #[serde(default = "default_max_adapt_depth")]
    pub max_adapt_depth: usize,
    /// Log a warning when a getter asks a class for a column it doesn't map
    #[serde(default = "default_warn_on_unknown_field")]
    pub warn_on_unknown_field: bool,
}

fn default_unknown_attribute_key() -> String {
    "<unknown>".to_string()
}

fn default_max_adapt_depth() -> usize {
    16
}

fn default_warn_on_unknown_field() -> bool {
    true
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            unknown_attribute_key: default_unknown_attribute_key(),
            max_adapt_depth: default_max_adapt_depth(),
            warn_on_unknown_field: default_warn_on_unknown_field(),
        }
    }
}

impl HybridConfig {
    /// Load settings from `config/config.toml`, falling back to env vars.
    ///
    /// A missing `[hybrid]` section is not an error: every key has a default.
    pub fn load() -> Result<Self, HybridError> {
        // File first, env overrides (LIFEGUARD__HYBRID__MAX_ADAPT_DEPTH, ...)
        let builder = Config::builder()
            .add_source(File::with_name("config/config.toml").required(false))
            .add_source(Environment::with_prefix("LIFEGUARD").separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if std::path::Path::new("config/config.toml").exists() {
                    log::warn!(
                        "failed to load config file, falling back to env. Error: {}",
                        err
                    );
                }
                // Retry with env only
                Config::builder()
                    .add_source(Environment::with_prefix("LIFEGUARD").separator("__"))
                    .build()
                    .map_err(|env_err| {
                        HybridError::Config(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        Self::from_config(&settings)
    }

    /// Extract the `hybrid` section from an already-built [`Config`].
    pub fn from_config(settings: &Config) -> Result<Self, HybridError> {
        match settings.get::<HybridConfig>("hybrid") {
            Ok(cfg) => Ok(cfg),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(HybridError::Config(format!(
                "hybrid configuration could not be loaded: {}",
                e
            ))),
        }
    }
}

/// Install process-wide settings.
///
/// Returns the rejected config if settings were already installed (or
/// already read through [`current`]).
pub fn init(config: HybridConfig) -> Result<(), HybridConfig> {
    CONFIG.set(config)
}

/// The process-wide settings, defaulting if [`init`] was never called.
pub fn current() -> &'static HybridConfig {
    CONFIG.get_or_init(HybridConfig::default)
}
