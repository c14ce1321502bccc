//! Tests for fatal records, run in a child process since fatal exits

use pretty_assertions::assert_eq;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use logcenter_core::{args, Entry, Hook, Log, LogCenter};
use tests::fixtures::{file_config, read_messages};

/// Directory the child writes to; unset outside the child
const CHILD_DIR_VAR: &str = "LOGCENTER_FATAL_DIR";

/// Writes the message of each fired entry to a file
struct MarkerHook(PathBuf);

impl Hook for MarkerHook {
    fn fire(&self, entry: &Entry) -> anyhow::Result<()> {
        std::fs::write(&self.0, &entry.message)?;
        Ok(())
    }
}

/// Body of the child process; a no-op in a normal test run
#[test]
fn fatal_child() {
    let Some(dir) = std::env::var_os(CHILD_DIR_VAR).map(PathBuf::from) else {
        return;
    };

    let log = LogCenter::new(
        file_config(&dir).with_hook(Arc::new(MarkerHook(dir.join("hook.txt")))),
    )
    .unwrap();

    log.fatal(&args!["boom"]);
    #[allow(unreachable_code)]
    {
        std::fs::write(dir.join("after.txt"), "still running").unwrap();
    }
}

/// Re-run this test binary on `fatal_child`, returning exit code and stderr
fn run_child(dir: &Path) -> (Option<i32>, String) {
    let (mut reader, writer) = os_pipe::pipe().unwrap();

    let mut command = Command::new(std::env::current_exe().unwrap());
    command
        .args(["fatal::fatal_child", "--exact", "--test-threads=1"])
        .env(CHILD_DIR_VAR, dir)
        .stdout(std::process::Stdio::null())
        .stderr(writer);
    let mut child = command.spawn().unwrap();
    // The pipe only reaches EOF once every write end is closed
    drop(command);

    let mut stderr = String::new();
    reader.read_to_string(&mut stderr).unwrap();
    let status = child.wait().unwrap();
    (status.code(), stderr)
}

#[test]
fn fatal_writes_record_then_exits() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stderr) = run_child(dir.path());

    assert_eq!(code, Some(1), "child stderr: {}", stderr);
    assert!(!stderr.contains("panicked"), "child stderr: {}", stderr);

    let records = read_messages(&dir.path().join("app.log"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["level"], "fatal");
    assert_eq!(records[0]["message"], "boom");

    assert_eq!(
        std::fs::read_to_string(dir.path().join("hook.txt")).unwrap(),
        "boom"
    );
    assert!(!dir.path().join("after.txt").exists());
}
