use crate::snapshot::{Snapshot, WorkflowStatus};
use crate::timeline::merge_recorded;

/// Pull request state shown in the header. ERROR has no badge of its own:
/// it renders as whatever the mapping below yields, which is always Open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBadge {
    Open,
    Closed,
    Merged,
}

impl StatusBadge {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        match snapshot.status {
            WorkflowStatus::Completed if merge_recorded(snapshot) => StatusBadge::Merged,
            WorkflowStatus::Completed => StatusBadge::Closed,
            _ => StatusBadge::Open,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusBadge::Open => "Open",
            StatusBadge::Closed => "Closed",
            StatusBadge::Merged => "Merged",
        }
    }
}

/// Generated test sources, separated by blank lines.
pub fn test_source(snapshot: &Snapshot) -> String {
    snapshot.generated_tests.join("\n\n")
}

/// `#<id> <title>` when the pull request has an id, else the bare title.
pub fn title_line(snapshot: &Snapshot) -> Option<String> {
    let title = snapshot.title()?;
    Some(match snapshot.pr_id() {
        Some(id) => format!("#{id} {title}"),
        None => title.to_string(),
    })
}
