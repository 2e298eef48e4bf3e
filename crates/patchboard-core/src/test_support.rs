use crate::snapshot::{PrDetails, Snapshot, WorkflowStatus};

pub(crate) fn snapshot(status: WorkflowStatus) -> Snapshot {
    Snapshot {
        status,
        ..Snapshot::default()
    }
}

pub(crate) fn with_files(mut snapshot: Snapshot, files: &[(&str, &str)]) -> Snapshot {
    let details = snapshot.pr_details.get_or_insert_with(PrDetails::default);
    details.files = files
        .iter()
        .map(|(name, content)| (name.to_string(), content.to_string()))
        .collect();
    snapshot
}

pub(crate) fn with_fixes(mut snapshot: Snapshot, fixes: &[(&str, &str)]) -> Snapshot {
    snapshot.fixed_code = fixes
        .iter()
        .map(|(name, content)| (name.to_string(), content.to_string()))
        .collect();
    snapshot
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
