//! In-memory log implementations for testing

use logcenter_core::{Entry, Hook, Log, Severity};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

// ============================================================================
// MemoryLog
// ============================================================================

/// Keeps every emitted entry in memory
pub struct MemoryLog {
    threshold: Severity,
    entries: Mutex<Vec<Entry>>,
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new(Severity::Debug)
    }
}

impl MemoryLog {
    pub fn new(threshold: Severity) -> Self {
        Self {
            threshold,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.entries.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Log for MemoryLog {
    fn enabled(&self, severity: Severity) -> bool {
        severity >= self.threshold
    }

    fn emit(&self, entry: Entry) {
        self.entries.lock().push(entry);
    }
}

// ============================================================================
// CountingHook
// ============================================================================

/// Counts the entries it is fired for
pub struct CountingHook {
    levels: Vec<Severity>,
    fired: AtomicUsize,
    messages: Mutex<Vec<String>>,
}

impl CountingHook {
    pub fn new(levels: Vec<Severity>) -> Self {
        Self {
            levels,
            fired: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.fired.load(Ordering::SeqCst)
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Hook for CountingHook {
    fn levels(&self) -> Vec<Severity> {
        self.levels.clone()
    }

    fn fire(&self, entry: &Entry) -> anyhow::Result<()> {
        self.fired.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().push(entry.message.clone());
        Ok(())
    }
}
