use crate::store::SnapshotStore;

/// Keeps the rendered file list in step with the latest snapshot.
///
/// The list is rebuilt only when the number of files differs from what was
/// last rendered. Two snapshots with the same count but different names do
/// not trigger a rebuild.
#[derive(Debug, Default)]
pub struct FileListReconciler {
    entries: Vec<String>,
    auto_selected: bool,
    rebuilds: u64,
}

impl FileListReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles against `store.latest()`, auto-selecting the first file
    /// once per run. Returns whether the list was rebuilt.
    pub fn reconcile(&mut self, store: &mut SnapshotStore) -> bool {
        let Some(snapshot) = store.latest() else {
            return false;
        };

        let rebuilt = snapshot.file_count() != self.entries.len();
        if rebuilt {
            self.entries = snapshot.file_names().map(str::to_string).collect();
            self.rebuilds += 1;
        }

        let first = snapshot.file_names().next().map(str::to_string);
        if !self.auto_selected && store.selected().is_none() {
            if let Some(first) = first {
                self.auto_selected = store.select_file(&first);
            }
        }

        rebuilt
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Index of the entry matching the current selection, recomputed on
    /// every call.
    pub fn active_index(&self, store: &SnapshotStore) -> Option<usize> {
        let selected = store.selected()?;
        self.entries.iter().position(|entry| entry == selected)
    }

    pub fn select_entry(&self, index: usize, store: &mut SnapshotStore) -> bool {
        match self.entries.get(index) {
            Some(filename) => store.select_file(filename),
            None => false,
        }
    }

    /// Moves the selection by `delta` entries, wrapping at either end.
    pub fn select_relative(&self, delta: isize, store: &mut SnapshotStore) -> bool {
        if self.entries.is_empty() {
            return false;
        }
        let len = self.entries.len() as isize;
        let next = match self.active_index(store) {
            Some(current) => (current as isize + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.select_entry(next as usize, store)
    }
}
