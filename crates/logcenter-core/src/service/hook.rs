//! Hooks fired after a record has been written

use std::sync::Arc;

use crate::domain::Severity;
use crate::log::Entry;

/// Observer of written records (alerting, counters, forwarding...)
pub trait Hook: Send + Sync {
    /// Severities this hook wants to see
    fn levels(&self) -> Vec<Severity> {
        Severity::ALL.to_vec()
    }

    fn fire(&self, entry: &Entry) -> anyhow::Result<()>;
}

/// Fire every hook registered for the entry's severity.
///
/// A failing hook is reported on stderr and never stops the others.
pub(crate) fn fire_all(hooks: &[Arc<dyn Hook>], entry: &Entry) {
    for hook in hooks {
        if !hook.levels().contains(&entry.severity) {
            continue;
        }
        if let Err(e) = hook.fire(entry) {
            eprintln!("Failed to fire hook: {:#}", e);
        }
    }
}
