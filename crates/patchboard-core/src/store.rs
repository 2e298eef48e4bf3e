use crate::snapshot::Snapshot;
use tracing::warn;

/// Latest snapshot of the current run plus the user's file selection.
///
/// The selection is held by filename only. A name that later disappears
/// from the snapshot simply resolves to "not present" on lookup.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    latest: Option<Snapshot>,
    selected: Option<String>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last-write-wins. Violations of the run-level invariants are logged
    /// but the snapshot is still applied.
    pub fn set_snapshot(&mut self, snapshot: Snapshot) {
        if let Some(previous) = &self.latest {
            check_run_invariants(previous, &snapshot);
        }
        self.latest = Some(snapshot);
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.latest.as_ref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selects `filename` if the latest snapshot contains it. Returns
    /// whether the selection was applied.
    pub fn select_file(&mut self, filename: &str) -> bool {
        let known = self
            .latest
            .as_ref()
            .map(|snapshot| snapshot.has_file(filename))
            .unwrap_or(false);
        if known {
            self.selected = Some(filename.to_string());
        }
        known
    }
}

fn check_run_invariants(previous: &Snapshot, next: &Snapshot) {
    if previous.status.is_terminal() && !next.status.is_terminal() {
        warn!(
            event = "snapshot_status_regression",
            from = %previous.status,
            to = %next.status,
        );
    }
    let missing: Vec<&str> = previous
        .file_names()
        .filter(|name| !next.has_file(name))
        .collect();
    if !missing.is_empty() {
        warn!(
            event = "snapshot_files_removed",
            count = missing.len(),
            first = missing[0],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::WorkflowStatus;

    fn snapshot_with_files(status: WorkflowStatus, files: &[&str]) -> Snapshot {
        let files: serde_json::Map<String, serde_json::Value> = files
            .iter()
            .map(|name| (name.to_string(), serde_json::json!("")))
            .collect();
        let value = serde_json::json!({
            "status": status.as_str(),
            "pr_details": {"files": files},
        });
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn selection_requires_a_known_file() {
        let mut store = SnapshotStore::new();
        assert!(!store.select_file("a.py"));
        assert_eq!(store.selected(), None);

        store.set_snapshot(snapshot_with_files(WorkflowStatus::Running, &["a.py"]));
        assert!(!store.select_file("b.py"));
        assert_eq!(store.selected(), None);
        assert!(store.select_file("a.py"));
        assert_eq!(store.selected(), Some("a.py"));
    }

    #[test]
    fn set_snapshot_is_last_write_wins() {
        let mut store = SnapshotStore::new();
        store.set_snapshot(snapshot_with_files(WorkflowStatus::Completed, &["a.py"]));
        store.set_snapshot(snapshot_with_files(WorkflowStatus::Running, &[]));
        let latest = store.latest().unwrap();
        assert_eq!(latest.status, WorkflowStatus::Running);
        assert_eq!(latest.file_count(), 0);
    }

    #[test]
    fn selection_survives_file_disappearing() {
        let mut store = SnapshotStore::new();
        store.set_snapshot(snapshot_with_files(WorkflowStatus::Running, &["a.py"]));
        assert!(store.select_file("a.py"));
        store.set_snapshot(snapshot_with_files(WorkflowStatus::Running, &["b.py"]));
        assert_eq!(store.selected(), Some("a.py"));
        assert_eq!(store.latest().unwrap().original_content("a.py"), None);
    }
}
