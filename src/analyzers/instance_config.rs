//! Launch configuration analyzer (I001-I006)
//!
//! Only runs when the bundle carries the instance's launch configuration.
//! Several rules only apply when `env = "production"`.

use crate::analyzers::base::{Analyzer, GlobalAnalyzer, GlobalContext};
use crate::config::InstanceThresholds;
use crate::models::{Category, Finding, Severity};
use crate::snapshot::{LaunchConfig, DEFAULT_PAYLOAD_LIMIT};
use anyhow::Result;
use serde_json::json;

const DOCS_LAUNCH: &str =
    "https://www.meilisearch.com/docs/learn/self_hosted/configure_meilisearch_at_launch";
const DOCS_SECURITY: &str = "https://www.meilisearch.com/docs/learn/security/basic_security";
const DOCS_SNAPSHOTS: &str = "https://www.meilisearch.com/docs/learn/data_backup/snapshots";

const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * MIB;

fn launch_ref(anchor: &str) -> String {
    format!("{}#{}", DOCS_LAUNCH, anchor)
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

pub struct InstanceConfigAnalyzer {
    thresholds: InstanceThresholds,
}

impl InstanceConfigAnalyzer {
    pub fn new(thresholds: InstanceThresholds) -> Self {
        Self { thresholds }
    }

    /// Run every launch-configuration rule against one config.
    pub fn check(&self, config: &LaunchConfig) -> Vec<Finding> {
        let mut findings = Vec::new();
        findings.extend(self.check_master_key(config));
        findings.extend(self.check_binding(config));
        findings.extend(self.check_log_level(config));
        findings.extend(self.check_snapshots(config));
        findings.extend(self.check_payload_limit(config));
        findings.extend(self.check_indexing_resources(config));
        findings
    }
}

impl Default for InstanceConfigAnalyzer {
    fn default() -> Self {
        Self::new(InstanceThresholds::default())
    }
}

impl Analyzer for InstanceConfigAnalyzer {
    fn name(&self) -> &'static str {
        "instance_config"
    }
}

impl GlobalAnalyzer for InstanceConfigAnalyzer {
    fn analyze_global(&self, ctx: &GlobalContext<'_>) -> Result<Vec<Finding>> {
        Ok(ctx
            .launch_config()
            .map(|config| self.check(config))
            .unwrap_or_default())
    }
}

impl InstanceConfigAnalyzer {
    /// I001
    fn check_master_key(&self, config: &LaunchConfig) -> Option<Finding> {
        if !config.is_production() {
            return None;
        }
        let min_len = self.thresholds.min_master_key_len;
        let recommended = json!({
            "master_key": format!("<secure random string of at least {} bytes>", min_len)
        });
        match config.master_key.as_deref() {
            None => Some(
                Finding::new(
                    "MEILI-I001",
                    Category::InstanceConfig,
                    Severity::Critical,
                    "Production environment without master key",
                )
                .with_description(
                    "The instance runs with env=production but no master_key is set, so \
                     every API route is reachable without authentication.",
                )
                .with_impact("No authentication; anyone can read or modify data")
                .with_current(json!({ "env": config.env, "master_key": null }))
                .with_recommended(recommended)
                .with_reference(DOCS_SECURITY)
                .with_reference(launch_ref("master-key")),
            ),
            Some(key) if key.len() < min_len => Some(
                Finding::new(
                    "MEILI-I001",
                    Category::InstanceConfig,
                    Severity::Critical,
                    "Master key too short for production",
                )
                .with_description(format!(
                    "The master key is only {} bytes; production instances require at \
                     least {} bytes.",
                    key.len(),
                    min_len
                ))
                .with_impact("Weak authentication; the master key may be guessable")
                .with_current(json!({
                    "master_key_length": key.len(),
                    "required_length": min_len,
                }))
                .with_recommended(recommended)
                .with_reference(DOCS_SECURITY),
            ),
            Some(_) => None,
        }
    }

    /// I002
    fn check_binding(&self, config: &LaunchConfig) -> Option<Finding> {
        if !config.binds_to_all_interfaces() || config.tls_configured() {
            return None;
        }
        let severity = if config.is_production() {
            Severity::Warning
        } else {
            Severity::Suggestion
        };
        Some(
            Finding::new(
                "MEILI-I002",
                Category::InstanceConfig,
                severity,
                "Binding to all interfaces without SSL",
            )
            .with_description(format!(
                "The instance binds to {} (all network interfaces) but SSL is not \
                 configured, so traffic travels unencrypted. Enable SSL or terminate TLS \
                 in a reverse proxy.",
                config.http_addr
            ))
            .with_impact("Unencrypted network traffic; credentials and data exposed")
            .with_current(json!({
                "http_addr": config.http_addr,
                "ssl_configured": false,
            }))
            .with_recommended(json!({
                "option_a": "Configure SSL with ssl_cert_path and ssl_key_path",
                "option_b": "Use a reverse proxy with TLS termination",
                "option_c": "Bind to localhost only if not needed externally",
            }))
            .with_reference(launch_ref("ssl-options")),
        )
    }

    /// I003
    fn check_log_level(&self, config: &LaunchConfig) -> Option<Finding> {
        if !config.is_production() {
            return None;
        }
        let level = config.log_level.to_uppercase();
        let finding = match level.as_str() {
            "DEBUG" | "TRACE" => Finding::new(
                "MEILI-I003",
                Category::InstanceConfig,
                Severity::Suggestion,
                "Verbose logging enabled in production",
            )
            .with_description(format!(
                "Log level is '{}' in production. DEBUG and TRACE output costs \
                 performance and fills disks quickly; use INFO or WARN.",
                config.log_level
            ))
            .with_impact("Performance overhead, disk usage, possible sensitive data in logs")
            .with_current(json!({ "log_level": config.log_level, "env": config.env })),
            "OFF" => Finding::new(
                "MEILI-I003",
                Category::InstanceConfig,
                Severity::Warning,
                "Logging disabled in production",
            )
            .with_description(
                "Log level is 'OFF' in production. No logs are produced, which makes \
                 incidents hard to diagnose.",
            )
            .with_impact("No visibility into instance behavior")
            .with_current(json!({ "log_level": config.log_level })),
            _ => return None,
        };
        Some(
            finding
                .with_recommended(json!({ "log_level": "INFO" }))
                .with_reference(launch_ref("log-level")),
        )
    }

    /// I004
    fn check_snapshots(&self, config: &LaunchConfig) -> Option<Finding> {
        if !config.is_production() || config.snapshots_scheduled() {
            return None;
        }
        Some(
            Finding::new(
                "MEILI-I004",
                Category::InstanceConfig,
                Severity::Suggestion,
                "No scheduled snapshots in production",
            )
            .with_description(
                "No snapshot schedule is configured. Scheduled snapshots allow a quick \
                 restore after a failure.",
            )
            .with_impact("No automated backups; longer recovery time after failures")
            .with_current(json!({ "schedule_snapshot": config.schedule_snapshot }))
            .with_recommended(json!({
                "schedule_snapshot": 86400,
                "snapshot_dir": "/path/to/persistent/storage/snapshots/",
            }))
            .with_reference(DOCS_SNAPSHOTS)
            .with_reference(launch_ref("schedule-snapshot-creation")),
        )
    }

    /// I005
    fn check_payload_limit(&self, config: &LaunchConfig) -> Option<Finding> {
        let bytes = config.payload_limit_bytes()?;
        let mb = bytes as f64 / MIB;
        let (title, description, impact, shown) = if bytes < self.thresholds.min_payload_bytes {
            (
                "HTTP payload size limit very low",
                format!(
                    "http_payload_size_limit is {} bytes ({:.2} MB). Normal-sized document \
                     batches may be rejected; the default is 100 MB.",
                    bytes, mb
                ),
                "Document ingestion may fail; forced to use very small batches",
                round_to(mb, 2),
            )
        } else if bytes > self.thresholds.max_payload_bytes {
            (
                "HTTP payload size limit very high",
                format!(
                    "http_payload_size_limit is {} bytes ({:.0} MB). Very large payloads \
                     can cause memory spikes and widen the denial-of-service surface.",
                    bytes, mb
                ),
                "Potential memory exhaustion; DoS risk",
                mb.round(),
            )
        } else {
            return None;
        };
        Some(
            Finding::new("MEILI-I005", Category::InstanceConfig, Severity::Warning, title)
                .with_description(description)
                .with_impact(impact)
                .with_current(json!({ "http_payload_size_limit": bytes, "in_mb": shown }))
                .with_recommended(json!({
                    "http_payload_size_limit": DEFAULT_PAYLOAD_LIMIT,
                    "in_mb": 100,
                }))
                .with_reference(launch_ref("payload-limit-size")),
        )
    }

    /// I006
    fn check_indexing_resources(&self, config: &LaunchConfig) -> Vec<Finding> {
        let mut findings = Vec::new();

        if let Some(bytes) = config.indexing_memory_bytes() {
            if bytes > self.thresholds.max_indexing_memory_bytes {
                findings.push(
                    Finding::new(
                        "MEILI-I006",
                        Category::InstanceConfig,
                        Severity::Suggestion,
                        "Very high indexing memory limit",
                    )
                    .with_description(format!(
                        "max_indexing_memory is {:.1} GB. Make sure the host has that \
                         much RAM, or the process may be killed by the OS.",
                        bytes as f64 / GIB
                    ))
                    .with_impact("Potential OOM crashes if system memory is insufficient")
                    .with_current(json!({
                        "max_indexing_memory": config.max_indexing_memory,
                        "in_gb": round_to(bytes as f64 / GIB, 1),
                    }))
                    .with_reference(launch_ref("max-indexing-memory")),
                );
            }
            if bytes < self.thresholds.min_indexing_memory_bytes {
                findings.push(
                    Finding::new(
                        "MEILI-I006",
                        Category::InstanceConfig,
                        Severity::Suggestion,
                        "Very low indexing memory limit",
                    )
                    .with_description(format!(
                        "max_indexing_memory is {:.0} MB, which slows indexing of larger \
                         documents and batches.",
                        bytes as f64 / MIB
                    ))
                    .with_impact("Slower indexing performance")
                    .with_current(json!({
                        "max_indexing_memory": config.max_indexing_memory,
                        "in_mb": (bytes as f64 / MIB).round(),
                    }))
                    .with_reference(launch_ref("max-indexing-memory")),
                );
            }
        }

        if let Some(threads) = config.max_indexing_threads {
            if threads > self.thresholds.max_indexing_threads {
                findings.push(
                    Finding::new(
                        "MEILI-I006",
                        Category::InstanceConfig,
                        Severity::Info,
                        "High indexing thread count configured",
                    )
                    .with_description(format!(
                        "max_indexing_threads is {}. Many indexing threads speed up \
                         ingestion but can hurt search latency while indexing runs.",
                        threads
                    ))
                    .with_impact("May impact search latency during heavy indexing")
                    .with_current(json!({ "max_indexing_threads": threads }))
                    .with_reference(launch_ref("max-indexing-threads")),
                );
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{ByteSize, InstanceSnapshot};

    fn check(raw: &str) -> Vec<Finding> {
        let config = LaunchConfig::from_toml_str(raw).unwrap();
        InstanceConfigAnalyzer::default().check(&config)
    }

    fn ids(findings: &[Finding]) -> Vec<(&str, Severity)> {
        findings.iter().map(|f| (f.id.as_str(), f.severity)).collect()
    }

    #[test]
    fn test_development_defaults_are_clean() {
        assert!(check("").is_empty());
    }

    #[test]
    fn test_production_without_key() {
        let findings = check(
            r#"
env = "production"
schedule_snapshot = 86400
"#,
        );
        assert_eq!(ids(&findings), vec![("MEILI-I001", Severity::Critical)]);
        assert_eq!(findings[0].title, "Production environment without master key");
    }

    #[test]
    fn test_short_master_key() {
        let findings = check(
            r#"
env = "production"
master-key = "short"
schedule-snapshot = true
"#,
        );
        assert_eq!(ids(&findings), vec![("MEILI-I001", Severity::Critical)]);
        assert_eq!(
            findings[0].current_value.as_ref().unwrap()["master_key_length"],
            5
        );
    }

    #[test]
    fn test_open_binding_severity_depends_on_env() {
        let dev = check(r#"http_addr = "0.0.0.0:7700""#);
        assert_eq!(ids(&dev), vec![("MEILI-I002", Severity::Suggestion)]);

        let prod = check(
            r#"
env = "production"
master_key = "a-very-long-master-key-value"
http_addr = "0.0.0.0:7700"
schedule_snapshot = true
"#,
        );
        assert_eq!(ids(&prod), vec![("MEILI-I002", Severity::Warning)]);

        let tls = check(
            r#"
http_addr = "0.0.0.0:7700"
ssl_cert_path = "/etc/cert.pem"
"#,
        );
        assert!(tls.is_empty());
    }

    #[test]
    fn test_log_level_in_production() {
        let base = r#"
env = "production"
master_key = "a-very-long-master-key-value"
schedule_snapshot = true
"#;
        let debug = check(&format!("{}log_level = \"debug\"", base));
        assert_eq!(ids(&debug), vec![("MEILI-I003", Severity::Suggestion)]);
        let off = check(&format!("{}log_level = \"OFF\"", base));
        assert_eq!(ids(&off), vec![("MEILI-I003", Severity::Warning)]);
    }

    #[test]
    fn test_missing_snapshots_in_production() {
        let findings = check(
            r#"
env = "production"
master_key = "a-very-long-master-key-value"
"#,
        );
        assert_eq!(ids(&findings), vec![("MEILI-I004", Severity::Suggestion)]);
    }

    #[test]
    fn test_payload_band() {
        let low = check(r#"http_payload_size_limit = "512 KiB""#);
        assert_eq!(ids(&low), vec![("MEILI-I005", Severity::Warning)]);
        assert_eq!(low[0].title, "HTTP payload size limit very low");

        let high = check(r#"http-payload-size-limit = "1 GiB""#);
        assert_eq!(high[0].title, "HTTP payload size limit very high");
        assert_eq!(high[0].current_value.as_ref().unwrap()["in_mb"], 1024.0);

        assert!(check(r#"http_payload_size_limit = "not a size""#).is_empty());
    }

    #[test]
    fn test_indexing_resources() {
        let mut config = LaunchConfig {
            max_indexing_memory: Some(ByteSize::Text("100 MiB".into())),
            max_indexing_threads: Some(32),
            ..Default::default()
        };
        let findings = InstanceConfigAnalyzer::default().check(&config);
        assert_eq!(
            ids(&findings),
            vec![
                ("MEILI-I006", Severity::Suggestion),
                ("MEILI-I006", Severity::Info)
            ]
        );

        config.max_indexing_memory = Some(ByteSize::Bytes(128 * 1024 * 1024 * 1024));
        config.max_indexing_threads = None;
        let findings = InstanceConfigAnalyzer::default().check(&config);
        assert_eq!(findings[0].title, "Very high indexing memory limit");
    }

    #[test]
    fn test_global_without_launch_config() {
        let instance = InstanceSnapshot::default();
        let ctx = GlobalContext {
            indexes: &[],
            instance: &instance,
            probe_results: None,
        };
        assert!(InstanceConfigAnalyzer::default()
            .analyze_global(&ctx)
            .unwrap()
            .is_empty());
    }
}
