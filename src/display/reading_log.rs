/// Append-only buffer of rendered lines with a view position that follows
/// the newest entry.
#[derive(Debug, Default, Clone)]
pub struct ReadingLog {
    lines: Vec<String>,
    /// Index of the line currently at the bottom of the view.
    view_end: usize,
}

impl ReadingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn scroll_to_end(&mut self) {
        self.view_end = self.lines.len();
    }

    pub fn is_scrolled_to_end(&self) -> bool {
        self.view_end == self.lines.len()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.view_end = 0;
    }
}
