//! JSONL audit log — append-only record of bind runs.

use crate::binder::BindReport;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A single audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub timestamp: String,
    pub run_id: String,
    pub url: String,
    pub fields_bound: u32,
    pub fields_skipped: u32,
    pub forms_hooked: u32,
    pub attempts: u32,
    pub duration_ms: u64,
    pub status: String,
}

/// Append-only JSONL audit logger.
pub struct AuditLogger {
    file: File,
}

impl AuditLogger {
    /// Open or create the audit log file.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open audit log: {}", path.display()))?;

        Ok(Self { file })
    }

    /// Open the default audit log at ~/.maskbind/audit.jsonl.
    pub fn default_logger() -> Result<Self> {
        let path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".maskbind")
            .join("audit.jsonl");
        Self::open(&path)
    }

    /// Log an audit event.
    pub fn log(&mut self, event: &AuditEvent) -> Result<()> {
        let json = serde_json::to_string(event)?;
        writeln!(self.file, "{json}")?;
        Ok(())
    }

    /// Log one bind run; returns the generated run id.
    pub fn log_run(
        &mut self,
        url: &str,
        report: &BindReport,
        duration_ms: u64,
        status: &str,
    ) -> Result<String> {
        let run_id = Uuid::new_v4().to_string();
        self.log(&AuditEvent {
            timestamp: Utc::now().to_rfc3339(),
            run_id: run_id.clone(),
            url: url.to_string(),
            fields_bound: report.fields_bound,
            fields_skipped: report.fields_skipped,
            forms_hooked: report.forms_hooked,
            attempts: report.attempts,
            duration_ms,
            status: status.to_string(),
        })?;
        Ok(run_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_run_appends_one_parseable_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let mut logger = AuditLogger::open(&path).unwrap();

        let report = BindReport {
            fields_bound: 2,
            fields_skipped: 0,
            forms_hooked: 1,
            attempts: 3,
        };
        let run_id = logger.log_run("https://example.com/form", &report, 120, "ok").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 1);

        let event: AuditEvent = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(event.run_id, run_id);
        assert_eq!(event.fields_bound, 2);
        assert_eq!(event.forms_hooked, 1);
        assert_eq!(event.status, "ok");
    }
}
