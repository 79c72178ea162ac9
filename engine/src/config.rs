//! Generator configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use subgen_client::PowMode;
use subgen_store::DEFAULT_CHECKPOINT_PATH;
use subgen_types::Tag;

use crate::builder::{BuildParams, Target};
use crate::publisher::PublishSettings;
use crate::EngineError;

/// Configuration for one generator run.
///
/// Built once (from a TOML file, CLI flags, or programmatically in tests) and
/// handed to the [`Orchestrator`](crate::Orchestrator) by reference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of records to build (ignored in retain mode).
    #[serde(default = "default_records")]
    pub records: usize,

    /// Node API endpoint.
    #[serde(default = "default_node")]
    pub node: String,

    /// Tag carried by every generated record.
    #[serde(default = "default_tag")]
    pub tag: String,

    /// Let the node attach records instead of doing proof-of-work locally.
    #[serde(default = "default_true")]
    pub remote_pow: bool,

    /// Pause between broadcasting two records, in milliseconds.
    #[serde(default = "default_broadcast_interval_ms")]
    pub broadcast_interval_ms: u64,

    /// Generate until interrupted instead of stopping at `records`.
    #[serde(default)]
    pub retain: bool,

    /// How many of the most recent records parents are drawn from.
    #[serde(default = "default_window")]
    pub window: usize,

    /// Where the in-progress subtangle is checkpointed.
    #[serde(default = "default_checkpoint_path")]
    pub checkpoint_path: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_records() -> usize {
    50
}

fn default_node() -> String {
    "http://localhost:14265".to_string()
}

fn default_tag() -> String {
    "SUBGEN".to_string()
}

fn default_true() -> bool {
    true
}

fn default_broadcast_interval_ms() -> u64 {
    10
}

fn default_window() -> usize {
    30
}

fn default_checkpoint_path() -> PathBuf {
    PathBuf::from(DEFAULT_CHECKPOINT_PATH)
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GeneratorConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, EngineError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| EngineError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.parsed_tag()?;
        if self.window == 0 {
            return Err(EngineError::Config("window must be at least 1".into()));
        }
        if !self.retain && self.records == 0 {
            return Err(EngineError::Config("records must be at least 1".into()));
        }
        if self.node.trim().is_empty() {
            return Err(EngineError::Config("node endpoint is empty".into()));
        }
        Ok(())
    }

    pub fn parsed_tag(&self) -> Result<Tag, EngineError> {
        Tag::new(self.tag.clone()).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn target(&self) -> Target {
        if self.retain {
            Target::Unbounded
        } else {
            Target::Count(self.records)
        }
    }

    pub fn pow_mode(&self) -> PowMode {
        if self.remote_pow {
            PowMode::Remote
        } else {
            PowMode::Local
        }
    }

    pub fn broadcast_interval(&self) -> Duration {
        Duration::from_millis(self.broadcast_interval_ms)
    }

    pub fn build_params(&self) -> Result<BuildParams, EngineError> {
        self.validate()?;
        Ok(BuildParams {
            target: self.target(),
            window: self.window,
            tag: self.parsed_tag()?,
        })
    }

    pub fn publish_settings(&self) -> PublishSettings {
        PublishSettings {
            interval: self.broadcast_interval(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            records: default_records(),
            node: default_node(),
            tag: default_tag(),
            remote_pow: default_true(),
            broadcast_interval_ms: default_broadcast_interval_ms(),
            retain: false,
            window: default_window(),
            checkpoint_path: default_checkpoint_path(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
