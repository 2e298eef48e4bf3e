use crate::color::{color_for, HexColor};
use crate::snapshot::{Snapshot, WorkflowStatus};

/// Substring in a log line that records a completed merge.
pub const MERGE_MARKER: &str = "merged";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    System,
    Finder,
    Fixer,
    Supervisor,
}

impl Actor {
    pub fn name(self) -> &'static str {
        match self {
            Actor::System => "System",
            Actor::Finder => "hacker-agent",
            Actor::Fixer => "fixer-agent",
            Actor::Supervisor => "supervisor-agent",
        }
    }

    pub fn avatar(self) -> HexColor {
        color_for(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub actor: Actor,
    pub message: String,
    pub items: Vec<String>,
}

impl TimelineEntry {
    fn new(actor: Actor, message: &str) -> Self {
        Self {
            actor,
            message: message.to_string(),
            items: Vec::new(),
        }
    }
}

pub fn merge_recorded(snapshot: &Snapshot) -> bool {
    snapshot.logs.iter().any(|line| line.contains(MERGE_MARKER))
}

/// Rebuilds the activity feed from scratch. Entry existence depends only
/// on the snapshot, so identical snapshots yield identical feeds.
pub fn build_timeline(snapshot: &Snapshot) -> Vec<TimelineEntry> {
    let mut entries = vec![TimelineEntry::new(
        Actor::System,
        "Ready to start simulation.",
    )];

    if !snapshot.vulnerabilities.is_empty() {
        let mut finding = TimelineEntry::new(Actor::Finder, "Found vulnerabilities:");
        finding.items = snapshot.vulnerabilities.clone();
        entries.push(finding);
    }

    if !snapshot.fixed_code.is_empty() {
        entries.push(TimelineEntry::new(
            Actor::Fixer,
            "Applied security patches and updated the file.",
        ));
    }

    if !snapshot.generated_tests.is_empty() {
        entries.push(TimelineEntry::new(
            Actor::Fixer,
            "Added security unit tests to verify fixes.",
        ));
    }

    if snapshot.status == WorkflowStatus::Completed && merge_recorded(snapshot) {
        entries.push(TimelineEntry::new(
            Actor::Supervisor,
            "Constraints satisfied. Merging PR.",
        ));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{snapshot, strings, with_files, with_fixes};

    fn actors(entries: &[TimelineEntry]) -> Vec<Actor> {
        entries.iter().map(|entry| entry.actor).collect()
    }

    #[test]
    fn empty_snapshot_only_has_ready_entry() {
        let entries = build_timeline(&Snapshot::default());
        assert_eq!(actors(&entries), vec![Actor::System]);
        assert_eq!(entries[0].message, "Ready to start simulation.");
    }

    #[test]
    fn findings_are_listed_in_order() {
        let mut snap = snapshot(WorkflowStatus::Running);
        snap.vulnerabilities = strings(&["SQL Injection", "Hardcoded Password"]);
        let entries = build_timeline(&snap);
        assert_eq!(actors(&entries), vec![Actor::System, Actor::Finder]);
        assert_eq!(entries[1].items, strings(&["SQL Injection", "Hardcoded Password"]));
    }

    #[test]
    fn full_run_produces_all_entries_in_fixed_order() {
        let mut snap = with_fixes(
            with_files(snapshot(WorkflowStatus::Completed), &[("a.py", "x")]),
            &[("a.py", "y")],
        );
        snap.vulnerabilities = strings(&["RCE"]);
        snap.generated_tests = strings(&["def test_a(): ..."]);
        snap.logs = strings(&["[10:00:02] PR #1 merged successfully."]);

        let entries = build_timeline(&snap);
        assert_eq!(
            actors(&entries),
            vec![
                Actor::System,
                Actor::Finder,
                Actor::Fixer,
                Actor::Fixer,
                Actor::Supervisor
            ]
        );
        assert_eq!(entries[4].message, "Constraints satisfied. Merging PR.");
    }

    #[test]
    fn merge_entry_requires_completed_status() {
        let mut snap = snapshot(WorkflowStatus::Running);
        snap.logs = strings(&["PR #1 merged successfully."]);
        assert_eq!(build_timeline(&snap).len(), 1);

        snap.status = WorkflowStatus::Error;
        assert_eq!(build_timeline(&snap).len(), 1);
    }

    #[test]
    fn feed_is_a_pure_function_of_the_snapshot() {
        let mut snap = snapshot(WorkflowStatus::Completed);
        snap.vulnerabilities = strings(&["XSS"]);
        snap.logs = strings(&["merged"]);
        let first = build_timeline(&snap);
        let second = build_timeline(&snap);
        assert_eq!(first, second);
        assert_eq!(format!("{first:?}"), format!("{second:?}"));
    }

    #[test]
    fn avatar_colors_follow_actor_names() {
        assert_eq!(Actor::System.avatar().to_string(), "#4f5e81");
        assert_eq!(Actor::Finder.avatar().to_string(), "#067c82");
        assert_eq!(Actor::Fixer.avatar(), color_for("fixer-agent"));
        assert_eq!(Actor::Supervisor.avatar().to_string(), "#607c65");
    }
}
