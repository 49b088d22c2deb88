//! Store configuration.
//!
//! Provides hierarchical configuration loading with:
//! - Default values as code base
//! - Optional configuration file
//! - Environment variable overrides (highest priority)

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::Result;
use crate::errors::StoreError;


/// Tunables for the store's channels and watch delivery.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    /// Capacity of the producer-side operation channel.
    ///
    /// Producers block once this many operations are queued ahead of the
    /// dispatcher; they never block on watch delivery.
    #[serde(default = "default_ops_capacity")]
    pub ops_capacity: usize,

    /// Capacity of the control channel carrying registrations, queries,
    /// trim and flush requests.
    #[serde(default = "default_command_capacity")]
    pub command_capacity: usize,

    /// Watch delivery settings.
    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WatchConfig {
    /// Buffer size for each watcher's event channel.
    ///
    /// A watcher that stops draining holds up further deliveries once its
    /// buffer fills, but only for notices at the head of the queue; the
    /// writer keeps applying operations regardless.
    #[serde(default = "default_watcher_buffer_size")]
    pub watcher_buffer_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ops_capacity: default_ops_capacity(),
            command_capacity: default_command_capacity(),
            watch: WatchConfig::default(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            watcher_buffer_size: default_watcher_buffer_size(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from hierarchical sources: defaults, then the
    /// file at `path` (if given), then `SEQSTORE__`-prefixed environment
    /// variables (e.g. `SEQSTORE__WATCH__WATCHER_BUFFER_SIZE=32`).
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        builder = builder.add_source(
            Environment::with_prefix("SEQSTORE")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let settings: StoreConfig = builder
            .build()
            .map_err(StoreError::from)?
            .try_deserialize()
            .map_err(StoreError::from)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validates channel and buffer sizes.
    pub fn validate(&self) -> Result<()> {
        if self.ops_capacity == 0 {
            return Err(StoreError::Config(
                "ops_capacity must be greater than 0".into(),
            ));
        }
        if self.command_capacity == 0 {
            return Err(StoreError::Config(
                "command_capacity must be greater than 0".into(),
            ));
        }
        self.watch.validate()
    }
}

impl WatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.watcher_buffer_size == 0 {
            return Err(StoreError::Config(
                "watch.watcher_buffer_size must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

const fn default_ops_capacity() -> usize {
    64
}

const fn default_command_capacity() -> usize {
    16
}

const fn default_watcher_buffer_size() -> usize {
    10
}
