use crate::snapshot::WorkflowStatus;
use crate::store::SnapshotStore;

pub const NO_CHANGES_PLACEHOLDER: &str = "(No changes required)";
pub const PENDING_FIX_PLACEHOLDER: &str = "(Pending fix...)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchedPane<'a> {
    Patched(&'a str),
    NoChangesRequired,
    PendingFix,
}

impl<'a> PatchedPane<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            PatchedPane::Patched(content) => content,
            PatchedPane::NoChangesRequired => NO_CHANGES_PLACEHOLDER,
            PatchedPane::PendingFix => PENDING_FIX_PLACEHOLDER,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        !matches!(self, PatchedPane::Patched(_))
    }
}

/// Original and patched views of the selected file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodePanes<'a> {
    pub filename: &'a str,
    pub original: &'a str,
    pub patched: PatchedPane<'a>,
}

/// `None` while nothing is selected; both panes then stay unrendered.
pub fn code_panes(store: &SnapshotStore) -> Option<CodePanes<'_>> {
    let filename = store.selected()?;
    let snapshot = store.latest()?;

    let original = snapshot.original_content(filename).unwrap_or_default();
    let patched = match snapshot.patched_content(filename) {
        Some(content) => PatchedPane::Patched(content),
        None if snapshot.status == WorkflowStatus::Completed => PatchedPane::NoChangesRequired,
        None => PatchedPane::PendingFix,
    };

    Some(CodePanes {
        filename,
        original,
        patched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{snapshot, with_files, with_fixes};

    fn store_for(status: WorkflowStatus, fixes: &[(&str, &str)]) -> SnapshotStore {
        let mut store = SnapshotStore::new();
        let snap = with_fixes(
            with_files(snapshot(status), &[("a.py", "x=1"), ("b.py", "y=2")]),
            fixes,
        );
        store.set_snapshot(snap);
        assert!(store.select_file("a.py"));
        store
    }

    #[test]
    fn nothing_selected_renders_nothing() {
        let mut store = SnapshotStore::new();
        store.set_snapshot(with_files(
            snapshot(WorkflowStatus::Running),
            &[("a.py", "x=1")],
        ));
        assert_eq!(code_panes(&store), None);
    }

    #[test]
    fn running_without_fix_is_pending() {
        let store = store_for(WorkflowStatus::Running, &[]);
        let panes = code_panes(&store).unwrap();
        assert_eq!(panes.filename, "a.py");
        assert_eq!(panes.original, "x=1");
        assert_eq!(panes.patched, PatchedPane::PendingFix);
        assert_eq!(panes.patched.text(), "(Pending fix...)");
    }

    #[test]
    fn completed_without_fix_needs_no_changes() {
        let store = store_for(WorkflowStatus::Completed, &[("b.py", "y=3")]);
        let panes = code_panes(&store).unwrap();
        assert_eq!(panes.patched, PatchedPane::NoChangesRequired);
        assert_eq!(panes.patched.text(), "(No changes required)");
        assert!(panes.patched.is_placeholder());
    }

    #[test]
    fn error_status_without_fix_stays_pending() {
        let store = store_for(WorkflowStatus::Error, &[]);
        assert_eq!(code_panes(&store).unwrap().patched, PatchedPane::PendingFix);
    }

    #[test]
    fn fix_wins_regardless_of_status() {
        for status in [
            WorkflowStatus::Running,
            WorkflowStatus::Completed,
            WorkflowStatus::Error,
        ] {
            let store = store_for(status, &[("a.py", "x=sanitize(1)")]);
            let panes = code_panes(&store).unwrap();
            assert_eq!(panes.patched, PatchedPane::Patched("x=sanitize(1)"));
            assert!(!panes.patched.is_placeholder());
        }
    }

    #[test]
    fn selection_missing_from_latest_resolves_empty() {
        let mut store = store_for(WorkflowStatus::Running, &[]);
        store.set_snapshot(with_files(snapshot(WorkflowStatus::Running), &[("b.py", "")]));
        let panes = code_panes(&store).unwrap();
        assert_eq!(panes.filename, "a.py");
        assert_eq!(panes.original, "");
        assert_eq!(panes.patched, PatchedPane::PendingFix);
    }
}
