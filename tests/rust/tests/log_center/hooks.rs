//! Tests for hooks registered on a LogCenter

use std::sync::Arc;

use logcenter_core::{args, Entry, Hook, Log, LogCenter, Severity, TraceInfo};
use tests::fixtures::{file_config, read_messages};
use tests::mocks::CountingHook;

struct FailingHook;

impl Hook for FailingHook {
    fn fire(&self, _entry: &Entry) -> anyhow::Result<()> {
        anyhow::bail!("alerting backend unavailable")
    }
}

#[test]
fn hooks_fire_for_their_levels() {
    let dir = tempfile::tempdir().unwrap();
    let all = Arc::new(CountingHook::new(Severity::ALL.to_vec()));
    let errors = Arc::new(CountingHook::new(vec![Severity::Error]));

    let log = LogCenter::new(
        file_config(dir.path())
            .with_hook(all.clone())
            .with_hook(errors.clone()),
    )
    .unwrap();

    log.debug(&args!["one"]);
    log.warn_context(&TraceInfo::new("svc"), "two", &[]);
    log.error(&args!["three"]);

    assert_eq!(all.count(), 3);
    assert_eq!(errors.count(), 1);
    assert_eq!(errors.messages(), ["three"]);
}

#[test]
fn hooks_skip_filtered_records() {
    let dir = tempfile::tempdir().unwrap();
    let hook = Arc::new(CountingHook::new(Severity::ALL.to_vec()));
    let log = LogCenter::new(
        file_config(dir.path())
            .with_severity_threshold("error")
            .with_hook(hook.clone()),
    )
    .unwrap();

    log.info(&args!["dropped"]);
    log.error(&args!["kept"]);

    assert_eq!(hook.messages(), ["kept"]);
}

#[test]
fn failing_hook_does_not_block_logging() {
    let dir = tempfile::tempdir().unwrap();
    let counter = Arc::new(CountingHook::new(Severity::ALL.to_vec()));
    let log = LogCenter::new(
        file_config(dir.path())
            .with_hook(Arc::new(FailingHook))
            .with_hook(counter.clone()),
    )
    .unwrap();

    log.info(&args!["still written"]);

    assert_eq!(counter.count(), 1);
    assert_eq!(read_messages(log.file_path())[0]["message"], "still written");
}
