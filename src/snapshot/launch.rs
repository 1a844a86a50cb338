//! Launch configuration of an instance (its `config.toml`)
//!
//! Meilisearch accepts both `snake_case` and `kebab-case` keys, so every
//! field carries a kebab alias.

use crate::error::MeiliscanError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAYLOAD_LIMIT: u64 = 104_857_600;

/// A byte size given either as a plain integer or a human string such as `"2 GiB"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ByteSize {
    Bytes(u64),
    Text(String),
}

impl ByteSize {
    /// Resolve to bytes using 1024-based units. Unparseable text yields `None`.
    pub fn as_bytes(&self) -> Option<u64> {
        match self {
            ByteSize::Bytes(n) => Some(*n),
            ByteSize::Text(s) => parse_byte_size(s),
        }
    }
}

pub fn parse_byte_size(raw: &str) -> Option<u64> {
    const UNITS: [(&str, u64); 9] = [
        ("KIB", 1 << 10),
        ("MIB", 1 << 20),
        ("GIB", 1 << 30),
        ("TIB", 1 << 40),
        ("KB", 1 << 10),
        ("MB", 1 << 20),
        ("GB", 1 << 30),
        ("TB", 1 << 40),
        ("B", 1),
    ];
    let value = raw.trim().to_uppercase();
    for (suffix, multiplier) in UNITS {
        if let Some(num) = value.strip_suffix(suffix) {
            let num: f64 = num.trim().parse().ok()?;
            if num < 0.0 {
                return None;
            }
            return Some((num * multiplier as f64) as u64);
        }
    }
    value.parse().ok()
}

/// `schedule_snapshot` is either a flag or an interval in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotSchedule {
    Enabled(bool),
    IntervalSecs(u64),
}

fn default_env() -> String {
    "development".to_string()
}

fn default_http_addr() -> String {
    "localhost:7700".to_string()
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_payload_limit() -> ByteSize {
    ByteSize::Bytes(DEFAULT_PAYLOAD_LIMIT)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchConfig {
    #[serde(default = "default_env")]
    pub env: String,
    #[serde(default, alias = "master-key")]
    pub master_key: Option<String>,
    #[serde(default = "default_http_addr", alias = "http-addr")]
    pub http_addr: String,
    #[serde(default, alias = "db-path")]
    pub db_path: Option<String>,
    #[serde(default = "default_log_level", alias = "log-level")]
    pub log_level: String,
    #[serde(default = "default_payload_limit", alias = "http-payload-size-limit")]
    pub http_payload_size_limit: ByteSize,
    #[serde(default, alias = "ssl-cert-path")]
    pub ssl_cert_path: Option<String>,
    #[serde(default, alias = "ssl-key-path")]
    pub ssl_key_path: Option<String>,
    #[serde(default, alias = "schedule-snapshot")]
    pub schedule_snapshot: Option<SnapshotSchedule>,
    #[serde(default, alias = "snapshot-dir")]
    pub snapshot_dir: Option<String>,
    #[serde(default, alias = "max-indexing-memory")]
    pub max_indexing_memory: Option<ByteSize>,
    #[serde(default, alias = "max-indexing-threads")]
    pub max_indexing_threads: Option<u32>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            env: default_env(),
            master_key: None,
            http_addr: default_http_addr(),
            db_path: None,
            log_level: default_log_level(),
            http_payload_size_limit: default_payload_limit(),
            ssl_cert_path: None,
            ssl_key_path: None,
            schedule_snapshot: None,
            snapshot_dir: None,
            max_indexing_memory: None,
            max_indexing_threads: None,
        }
    }
}

impl LaunchConfig {
    /// Parse a Meilisearch `config.toml`. Unknown keys are ignored.
    pub fn from_toml_str(raw: &str) -> Result<Self, MeiliscanError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    pub fn binds_to_all_interfaces(&self) -> bool {
        self.http_addr.starts_with("0.0.0.0:")
    }

    pub fn tls_configured(&self) -> bool {
        self.ssl_cert_path.is_some() || self.ssl_key_path.is_some()
    }

    pub fn snapshots_scheduled(&self) -> bool {
        match self.schedule_snapshot {
            Some(SnapshotSchedule::Enabled(on)) => on,
            Some(SnapshotSchedule::IntervalSecs(secs)) => secs > 0,
            None => false,
        }
    }

    pub fn payload_limit_bytes(&self) -> Option<u64> {
        self.http_payload_size_limit.as_bytes()
    }

    pub fn indexing_memory_bytes(&self) -> Option<u64> {
        self.max_indexing_memory.as_ref()?.as_bytes()
    }
}
