/// Console surface for the workflow's event log.
///
/// Follows the tail while new lines arrive; scrolling up detaches it until
/// the user returns to the bottom or the log grows again.
#[derive(Debug)]
pub struct LogPane {
    lines: Vec<String>,
    follow_tail: bool,
    offset: usize,
    viewport: usize,
}

impl Default for LogPane {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            follow_tail: true,
            offset: 0,
            viewport: 0,
        }
    }
}

impl LogPane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the pane's content with `logs`. An empty `logs` keeps what
    /// is shown. Returns whether the log grew.
    pub fn sync(&mut self, logs: &[String]) -> bool {
        if logs.is_empty() || logs == self.lines.as_slice() {
            return false;
        }
        let grew = logs.len() > self.lines.len();
        self.lines = logs.to_vec();
        if grew {
            self.follow_tail = true;
        }
        grew
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_following(&self) -> bool {
        self.follow_tail
    }

    /// First visible line for a viewport of `height` rows.
    pub fn scroll_offset(&mut self, height: usize) -> usize {
        self.viewport = height;
        let max = self.max_offset();
        if self.follow_tail {
            self.offset = max;
        } else {
            self.offset = self.offset.min(max);
        }
        self.offset
    }

    pub fn scroll_up(&mut self, rows: usize) {
        let current = self.scroll_offset(self.viewport);
        self.offset = current.saturating_sub(rows);
        self.follow_tail = self.offset >= self.max_offset();
    }

    pub fn scroll_down(&mut self, rows: usize) {
        let current = self.scroll_offset(self.viewport);
        self.offset = current.saturating_add(rows).min(self.max_offset());
        self.follow_tail = self.offset >= self.max_offset();
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport)
    }
}
