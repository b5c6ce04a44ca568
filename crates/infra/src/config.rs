//! Configuration loading and representation.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use procura_observability::LogFormat;

pub const ENV_PO_SEQUENCE_FLOOR: &str = "PROCURA_PO_SEQUENCE_FLOOR";
pub const ENV_AUDIT_QUEUE_CAPACITY: &str = "PROCURA_AUDIT_QUEUE_CAPACITY";
pub const ENV_AUDIT_WORKER_NAME: &str = "PROCURA_AUDIT_WORKER_NAME";
pub const ENV_LOG_FORMAT: &str = "PROCURA_LOG_FORMAT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcurementConfig {
    /// The allocator hands out `floor + 1` first.
    pub po_sequence_floor: u64,
    /// Bounded audit channel size; records beyond it are dropped.
    pub audit_queue_capacity: usize,
    pub audit_worker_name: String,
    pub log_format: LogFormat,
}

impl Default for ProcurementConfig {
    fn default() -> Self {
        Self {
            po_sequence_floor: 1000,
            audit_queue_capacity: 1024,
            audit_worker_name: "audit-worker".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl ProcurementConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary key lookup.
    ///
    /// Missing keys keep their defaults; unparsable values are logged and
    /// ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            po_sequence_floor: parse_or(&lookup, ENV_PO_SEQUENCE_FLOOR, defaults.po_sequence_floor),
            audit_queue_capacity: match parse_or(&lookup, ENV_AUDIT_QUEUE_CAPACITY, defaults.audit_queue_capacity) {
                0 => {
                    warn!(key = ENV_AUDIT_QUEUE_CAPACITY, "audit queue capacity must be positive, using default");
                    defaults.audit_queue_capacity
                }
                n => n,
            },
            audit_worker_name: lookup(ENV_AUDIT_WORKER_NAME)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.audit_worker_name),
            log_format: parse_or(&lookup, ENV_LOG_FORMAT, defaults.log_format),
        }
    }

    /// Install the global subscriber in the configured format.
    ///
    /// Returns `false` when a subscriber was already installed.
    pub fn init_tracing(&self) -> bool {
        procura_observability::init_with(self.log_format)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(v) => v,
            Err(err) => {
                warn!(key, value = %raw, error = %err, "invalid configuration value, using default");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(ProcurementConfig::from_lookup(lookup(&[])), ProcurementConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let cfg = ProcurementConfig::from_lookup(lookup(&[
            (ENV_PO_SEQUENCE_FLOOR, "5000"),
            (ENV_AUDIT_QUEUE_CAPACITY, "16"),
            (ENV_AUDIT_WORKER_NAME, "audit-1"),
            (ENV_LOG_FORMAT, "pretty"),
        ]));
        assert_eq!(cfg.po_sequence_floor, 5000);
        assert_eq!(cfg.audit_queue_capacity, 16);
        assert_eq!(cfg.audit_worker_name, "audit-1");
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn invalid_values_fall_back() {
        let cfg = ProcurementConfig::from_lookup(lookup(&[
            (ENV_PO_SEQUENCE_FLOOR, "lots"),
            (ENV_AUDIT_QUEUE_CAPACITY, "0"),
            (ENV_LOG_FORMAT, "xml"),
        ]));
        assert_eq!(cfg, ProcurementConfig::default());
    }

    #[test]
    fn tracing_is_installed_once() {
        let cfg = ProcurementConfig::from_lookup(lookup(&[(ENV_LOG_FORMAT, "pretty")]));
        let _ = cfg.init_tracing();
        assert!(!cfg.init_tracing());
    }

    #[test]
    fn deserializes_partial_documents() {
        let cfg: ProcurementConfig =
            serde_json::from_str(r#"{"po_sequence_floor": 42, "log_format": "pretty"}"#).unwrap();
        assert_eq!(cfg.po_sequence_floor, 42);
        assert_eq!(cfg.audit_queue_capacity, 1024);
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }
}
