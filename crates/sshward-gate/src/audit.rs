use chrono::Utc;
use serde::Serialize;
use sshward_policy::{Category, Decision, EffectiveMode};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::AuditConfig;

/// One audit record, written as a JSON line.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogEntry {
    pub timestamp: String,
    pub connection_id: String,
    pub event: String, // "decision", "session_open", "session_close"
    pub category: Option<Category>,
    pub candidate: Option<String>,
    pub mode: Option<EffectiveMode>,
    pub decision: Option<Decision>,
    pub forced: Option<bool>,
    pub open_sessions: Option<u32>,
}

/// Decision audit trail: always to `tracing`, optionally to a rotated file.
pub struct AuditLogger {
    enabled: bool,
    log_commands: bool,
    log_file: Option<PathBuf>,
    max_size_bytes: u64,
    keep_logs: u32,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    pub fn new() -> Self {
        Self::with_config(&AuditConfig::default())
    }

    pub fn with_config(config: &AuditConfig) -> Self {
        AuditLogger {
            enabled: config.enabled,
            log_commands: config.log_commands,
            log_file: config.log_file.clone(),
            max_size_bytes: config.max_size_bytes,
            keep_logs: config.keep_logs,
            write_lock: Mutex::new(()),
        }
    }

    pub fn disabled() -> Self {
        AuditLogger {
            enabled: false,
            ..Self::new()
        }
    }

    /// Record an admission decision.
    pub fn log_decision(
        &self,
        connection_id: &str,
        category: Category,
        candidate: &str,
        mode: EffectiveMode,
        decision: Decision,
        forced: bool,
    ) {
        if !self.enabled {
            return;
        }

        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            connection_id: connection_id.to_string(),
            event: "decision".to_string(),
            category: Some(category),
            candidate: self.loggable_candidate(category, candidate),
            mode: Some(mode),
            decision: Some(decision),
            forced: Some(forced),
            open_sessions: None,
        };

        self.emit_log_entry(&entry);
    }

    /// Record a session channel opening or closing.
    pub fn log_session(&self, connection_id: &str, opened: bool, open_sessions: u32) {
        if !self.enabled {
            return;
        }

        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            connection_id: connection_id.to_string(),
            event: if opened {
                "session_open".to_string()
            } else {
                "session_close".to_string()
            },
            category: None,
            candidate: None,
            mode: None,
            decision: None,
            forced: None,
            open_sessions: Some(open_sessions),
        };

        self.emit_log_entry(&entry);
    }

    /// Env candidates are variable names only; command text is optional.
    pub(crate) fn loggable_candidate(&self, category: Category, candidate: &str) -> Option<String> {
        match category {
            Category::Shell | Category::Tty => None,
            Category::Command if !self.log_commands => None,
            _ => Some(candidate.to_string()),
        }
    }

    fn emit_log_entry(&self, entry: &AuditLogEntry) {
        let json = match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize audit entry: {}", e);
                return;
            }
        };

        tracing::info!(target: "sshward::audit", "{}", json);

        if let Some(log_file) = &self.log_file {
            if let Err(e) = self.write_to_file(&json, log_file) {
                tracing::error!("Failed to write audit log {}: {}", log_file.display(), e);
            }
        }
    }

    fn write_to_file(&self, json: &str, log_file: &Path) -> std::io::Result<()> {
        let line = format!("{}\n", json);
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let current_size = fs::metadata(log_file).map(|m| m.len()).unwrap_or(0);
        if current_size > 0 && current_size + line.len() as u64 > self.max_size_bytes {
            self.rotate_logs(log_file)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;
        file.write_all(line.as_bytes())
    }

    /// Shift `log.N` to `log.N+1`, dropping anything past `keep_logs`, then move the
    /// live file to `log.1`.
    fn rotate_logs(&self, log_file: &Path) -> std::io::Result<()> {
        let rotated = |i: u32| PathBuf::from(format!("{}.{}", log_file.display(), i));

        if self.keep_logs == 0 {
            return fs::write(log_file, "");
        }

        let oldest = rotated(self.keep_logs);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for i in (1..self.keep_logs).rev() {
            let from = rotated(i);
            if from.exists() {
                fs::rename(&from, rotated(i + 1))?;
            }
        }
        fs::rename(log_file, rotated(1))
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}
