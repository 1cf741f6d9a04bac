use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GateError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Policy file (YAML, or JSON with a `.json` extension)
    pub policy_path: PathBuf,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Max audit log size before rotation (bytes)
    #[serde(default = "default_max_log_size")]
    pub max_size_bytes: u64,

    /// Number of rotated logs to keep
    #[serde(default = "default_keep_logs")]
    pub keep_logs: u32,

    /// Record exec command lines, which may carry credentials
    #[serde(default = "default_log_commands")]
    pub log_commands: bool,
}

impl GateConfig {
    /// Load config from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GateError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| GateError::ConfigError(format!("Failed to read config: {}", e)))?;

        serde_yaml::from_str(&content)
            .map_err(|e| GateError::ConfigError(format!("Invalid YAML: {}", e)))
    }

    /// Load config from environment or defaults
    pub fn from_env() -> Self {
        GateConfig {
            policy_path: std::env::var("SSHWARD_POLICY_PATH")
                .unwrap_or_else(|_| "/etc/sshward/policy.yaml".to_string())
                .into(),
            audit: AuditConfig {
                enabled: std::env::var("SSHWARD_AUDIT_ENABLED")
                    .ok()
                    .map(|v| v == "true")
                    .unwrap_or(true),
                log_file: std::env::var("SSHWARD_AUDIT_LOG").ok().map(PathBuf::from),
                ..AuditConfig::default()
            },
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        AuditConfig {
            enabled: default_audit_enabled(),
            log_file: None,
            max_size_bytes: default_max_log_size(),
            keep_logs: default_keep_logs(),
            log_commands: default_log_commands(),
        }
    }
}

// Defaults
fn default_audit_enabled() -> bool {
    true
}

fn default_max_log_size() -> u64 {
    100 * 1024 * 1024 // 100MB
}

fn default_keep_logs() -> u32 {
    10
}

fn default_log_commands() -> bool {
    true
}
