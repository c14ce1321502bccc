//! Shared test utilities and fixtures for LogCenter integration tests.

pub use logcenter_core::{Entry, Log, LogCenter, LogCenterConfig, Severity, TraceInfo};

/// In-memory log implementations
pub mod mocks;
pub use mocks::{CountingHook, MemoryLog};

/// Fixtures for file-backed log centers
pub mod fixtures {
    use logcenter_core::{LogCenter, LogCenterConfig};
    use serde_json::Value;
    use std::path::Path;

    /// Config writing to `<dir>/app.log`, console off
    pub fn file_config(dir: &Path) -> LogCenterConfig {
        LogCenterConfig::default()
            .with_service_name("test_service")
            .with_file_path(dir.join("app.log"))
            .with_console(false)
    }

    /// Log center writing to `<dir>/app.log`
    pub fn file_center(dir: &Path, threshold: &str) -> LogCenter {
        LogCenter::new(file_config(dir).with_severity_threshold(threshold))
            .expect("log center should start")
    }

    /// Every JSON record of a log file, in order
    pub fn read_records(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(|line| serde_json::from_str(line).expect("record should be JSON"))
            .collect()
    }

    /// Records minus the startup line
    pub fn read_messages(path: &Path) -> Vec<Value> {
        read_records(path)
            .into_iter()
            .filter(|record| record["message"] != "log center started")
            .collect()
    }
}
