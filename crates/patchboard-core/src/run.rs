use crate::diff_view::{code_panes, CodePanes};
use crate::files::FileListReconciler;
use crate::graph::{GraphAnimator, GraphState};
use crate::logs::LogPane;
use crate::snapshot::{Snapshot, WorkflowStatus};
use crate::store::SnapshotStore;
use crate::surfaces::{self, StatusBadge};
use crate::timeline::{build_timeline, TimelineEntry};

/// Everything one run owns: the snapshot store, the file selection and
/// the render state of each surface. A new run starts from
/// `Run::default()`.
#[derive(Debug, Default)]
pub struct Run {
    store: SnapshotStore,
    file_list: FileListReconciler,
    graph: GraphAnimator,
    logs: LogPane,
    title: Option<String>,
    applied: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotOutcome {
    pub status: WorkflowStatus,
    pub graph: GraphState,
    pub files_rebuilt: bool,
    pub logs_grew: bool,
}

impl SnapshotOutcome {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

impl Run {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `snapshot` and brings every incremental surface up to date.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> SnapshotOutcome {
        if let Some(title) = surfaces::title_line(&snapshot) {
            self.title = Some(title);
        }
        let logs_grew = self.logs.sync(&snapshot.logs);
        let graph = self.graph.apply(snapshot.current_step());
        let status = snapshot.status;

        self.store.set_snapshot(snapshot);
        let files_rebuilt = self.file_list.reconcile(&mut self.store);
        self.applied += 1;

        SnapshotOutcome {
            status,
            graph,
            files_rebuilt,
            logs_grew,
        }
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.store.latest()
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn snapshots_applied(&self) -> u64 {
        self.applied
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn status(&self) -> Option<WorkflowStatus> {
        self.latest().map(|snapshot| snapshot.status)
    }

    pub fn status_badge(&self) -> StatusBadge {
        self.latest()
            .map(StatusBadge::from_snapshot)
            .unwrap_or(StatusBadge::Open)
    }

    pub fn file_count(&self) -> usize {
        self.latest().map(Snapshot::file_count).unwrap_or(0)
    }

    pub fn file_entries(&self) -> &[String] {
        self.file_list.entries()
    }

    pub fn active_file_index(&self) -> Option<usize> {
        self.file_list.active_index(&self.store)
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.store.selected()
    }

    pub fn select_file(&mut self, filename: &str) -> bool {
        self.store.select_file(filename)
    }

    pub fn select_file_entry(&mut self, index: usize) -> bool {
        self.file_list.select_entry(index, &mut self.store)
    }

    pub fn select_relative_file(&mut self, delta: isize) -> bool {
        self.file_list.select_relative(delta, &mut self.store)
    }

    pub fn code_panes(&self) -> Option<CodePanes<'_>> {
        code_panes(&self.store)
    }

    pub fn timeline(&self) -> Vec<TimelineEntry> {
        match self.latest() {
            Some(snapshot) => build_timeline(snapshot),
            None => Vec::new(),
        }
    }

    pub fn test_source(&self) -> String {
        self.latest().map(surfaces::test_source).unwrap_or_default()
    }

    pub fn graph(&self) -> &GraphAnimator {
        &self.graph
    }

    pub fn logs(&self) -> &LogPane {
        &self.logs
    }

    pub fn logs_mut(&mut self) -> &mut LogPane {
        &mut self.logs
    }
}
