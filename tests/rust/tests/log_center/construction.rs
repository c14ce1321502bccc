//! Tests for LogCenter construction and configuration errors

use logcenter_core::{args, Log, LogCenter, LogCenterConfig, LogCenterError, SinkKind};
use tests::fixtures::{file_config, read_messages};

#[test]
fn strict_mode_rejects_unknown_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(dir.path())
        .with_severity_threshold("verbose")
        .with_strict_severity(true);

    match LogCenter::new(config) {
        Err(LogCenterError::InvalidSeverity(name)) => assert_eq!(name, "verbose"),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("strict mode should reject an unknown threshold"),
    }
}

#[test]
fn strict_mode_accepts_any_case() {
    let dir = tempfile::tempdir().unwrap();
    let log = LogCenter::new(
        file_config(dir.path())
            .with_severity_threshold("Warning")
            .with_strict_severity(true),
    )
    .unwrap();
    assert_eq!(log.threshold(), logcenter_core::Severity::Warn);
}

#[test]
fn unwritable_destination_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "a regular file").unwrap();

    let config = file_config(dir.path()).with_file_path(blocker.join("app.log"));
    let err = LogCenter::new(config).err().expect("construction should fail");
    assert!(matches!(err, LogCenterError::Sink { .. }));
    assert!(err.to_string().contains("app.log"));
}

#[test]
fn invalid_filter_directives_are_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = file_config(dir.path()).with_filter_directives("=[broken");
    assert!(matches!(
        LogCenter::new(config),
        Err(LogCenterError::InvalidFilter { .. })
    ));
}

#[test]
fn missing_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a/b/c/service.log");
    let log = LogCenter::new(
        LogCenterConfig::default()
            .with_file_path(&path)
            .with_console(false),
    )
    .unwrap();

    log.info(&args!["hello"]);
    assert!(path.exists());
    assert_eq!(read_messages(&path).len(), 1);
}

#[test]
fn append_sink_writes_records() {
    let dir = tempfile::tempdir().unwrap();
    let log = LogCenter::new(
        file_config(dir.path())
            .with_sink(SinkKind::Append)
            .with_max_size(1),
    )
    .unwrap();

    log.warn(&args!["appended"]);
    let records = read_messages(log.file_path());
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["message"], "appended");
}

#[test]
fn explicit_path_beats_service_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("explicit.log");
    let config = LogCenterConfig::default()
        .with_file_path(&path)
        .with_service_name("ignored_for_path")
        .with_console(false);

    let log = LogCenter::new(config).unwrap();
    assert_eq!(log.file_path(), path.as_path());
}

#[test]
fn config_from_environment_values() {
    let vars = [
        ("LOG_SERVICE_NAME", "orders"),
        ("LOG_LEVEL", "error"),
        ("LOG_MAX_BACKUPS", "9"),
        ("LOG_STRICT_LEVEL", "yes"),
    ];
    let config = LogCenterConfig::from_lookup(|key| {
        vars.iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.to_string())
    })
    .unwrap();

    assert_eq!(config.service_name, "orders");
    assert_eq!(config.severity_threshold, "error");
    assert_eq!(config.max_backups, 9);
    assert!(config.strict_severity);
}
