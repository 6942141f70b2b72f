//! Run configuration for the aliquot explorer.
//!
//! Provides [`ExplorerConfig`] with defaults for the data directory, limits,
//! and cache sizing. Values are layered: built-in defaults, then an optional
//! config file, then `ALIQUOT_*` environment variables. The CLI applies its
//! flags on top.

use std::path::{Path, PathBuf};

use aliquot_core::constants::{
    DEFAULT_CACHE_CEILING, DEFAULT_GROWTH_BOUND, DEFAULT_MAX_STEPS, DEFAULT_N_MAX,
    FACTORS_FILE_NAME, MASK_FILE_NAME, sieve_limit_for,
};
use aliquot_core::error::ConfigError;
use aliquot_core::types::Limits;
use serde::{Deserialize, Serialize};

/// Prefix for environment overrides, e.g. `ALIQUOT_MAX_STEPS=30`.
pub const ENV_PREFIX: &str = "ALIQUOT";

/// Configuration for one explorer run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Directory holding the mask and factor cache files.
    pub data_dir: PathBuf,
    /// Step budget `K`.
    pub max_steps: u32,
    /// Growth bound `I`.
    pub growth_bound: u64,
    /// Survey seeds `1..=n_max`.
    pub n_max: u64,
    /// Factorizations of `n <= cache_ceiling` are persisted.
    pub cache_ceiling: u64,
    /// Maximum session-only cache entries before eviction; `None` is unbounded.
    pub session_cache_limit: Option<usize>,
    /// Read and write state files. When false the run starts cold and leaves
    /// nothing behind.
    pub persist: bool,
    /// Log level filter string (e.g. "info", "debug", "aliquot_engine=trace").
    pub log_level: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("aliquot");

        Self {
            data_dir,
            max_steps: DEFAULT_MAX_STEPS,
            growth_bound: DEFAULT_GROWTH_BOUND,
            n_max: DEFAULT_N_MAX,
            cache_ceiling: DEFAULT_CACHE_CEILING,
            session_cache_limit: None,
            persist: true,
            log_level: "info".to_string(),
        }
    }
}

impl ExplorerConfig {
    /// Layer defaults, the optional file at `path`, and the environment.
    ///
    /// A missing `path` is an error; omitting `path` skips the file layer.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = config::Config::try_from(&Self::default()).map_err(invalid)?;
        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let cfg: Self = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(invalid)?
            .try_deserialize()
            .map_err(invalid)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.limits().map(|_| ())
    }

    /// Validated stopping parameters.
    pub fn limits(&self) -> Result<Limits, ConfigError> {
        Limits::new(self.max_steps, self.growth_bound)
    }

    /// Sieve size needed to factor every term below the growth bound.
    pub fn sieve_limit(&self) -> u64 {
        sieve_limit_for(self.growth_bound)
    }

    /// Path to the primality mask file.
    pub fn mask_path(&self) -> PathBuf {
        self.data_dir.join(MASK_FILE_NAME)
    }

    /// Path to the factorization cache file.
    pub fn factors_path(&self) -> PathBuf {
        self.data_dir.join(FACTORS_FILE_NAME)
    }
}

fn invalid(e: config::ConfigError) -> ConfigError {
    ConfigError::Invalid(e.to_string())
}
