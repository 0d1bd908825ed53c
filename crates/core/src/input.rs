use unicode_segmentation::UnicodeSegmentation;

/// Single-line editor with submit history.
///
/// `history` gains one entry per non-empty submission, in submission order,
/// with no eviction and no deduplication. `index` is the navigation cursor:
/// `None` is the present (empty) position, `Some(i)` means `history[i]` is
/// loaded into the buffer. Any edit that is not Up/Down navigation ends the
/// navigation session, so the next Up starts again from the newest entry.
#[derive(Debug, Default)]
pub struct InputLine {
    buffer: String,
    cursor: usize,
    history: Vec<String>,
    index: Option<usize>,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with preloaded history (e.g. restored from disk). Navigation
    /// begins at the present position.
    pub fn with_history(history: Vec<String>) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Caret position as a grapheme index into the buffer.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// `Some(i)` while navigating history, `None` at the present position.
    pub fn history_index(&self) -> Option<usize> {
        self.index
    }

    /// Submit the current line. A line that trims to empty is suppressed and
    /// nothing changes. Otherwise the trimmed line is appended to history,
    /// the buffer and caret are cleared, navigation resets to the present
    /// position, and the line is returned for dispatch.
    pub fn submit(&mut self) -> Option<String> {
        let text = self.buffer.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.history.push(text.clone());
        self.index = None;
        self.buffer.clear();
        self.cursor = 0;
        Some(text)
    }

    /// Load the previous history entry. No-op at the oldest entry or when
    /// history is empty. The caret moves to the end of the loaded text.
    pub fn navigate_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.index {
            None => self.history.len() - 1,
            Some(0) => return,
            Some(i) => i - 1,
        };
        self.load_entry(idx);
    }

    /// Load the next history entry; from the newest entry this clears the
    /// buffer and returns to the present position. No-op while not
    /// navigating.
    pub fn navigate_down(&mut self) {
        let Some(i) = self.index else {
            return;
        };
        if i + 1 < self.history.len() {
            self.load_entry(i + 1);
        } else {
            self.index = None;
            self.buffer.clear();
            self.cursor = 0;
        }
    }

    /// End the navigation session without touching the buffer. Every editing
    /// method below calls this; the UI calls it directly for keystrokes that
    /// map to no edit at all.
    pub fn end_navigation(&mut self) {
        self.index = None;
    }

    fn load_entry(&mut self, idx: usize) {
        self.index = Some(idx);
        self.buffer = self.history[idx].clone();
        self.cursor = self.buffer.graphemes(true).count();
    }

    pub fn insert_text(&mut self, s: &str) {
        self.end_navigation();
        let parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let idx = self.cursor.min(parts.len());
        let mut new_buffer = String::new();
        for g in &parts[..idx] {
            new_buffer.push_str(g);
        }
        new_buffer.push_str(s);
        for g in &parts[idx..] {
            new_buffer.push_str(g);
        }
        self.buffer = new_buffer;
        let added = s.graphemes(true).count();
        self.cursor = (idx + added).min(self.buffer.graphemes(true).count());
    }

    pub fn delete_left_grapheme(&mut self) {
        self.end_navigation();
        if self.cursor == 0 {
            return;
        }
        let mut parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let idx = self.cursor.min(parts.len());
        parts.remove(idx - 1);
        self.buffer = parts.concat();
        self.cursor = idx - 1;
    }

    pub fn delete_right_grapheme(&mut self) {
        self.end_navigation();
        let mut parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let idx = self.cursor.min(parts.len());
        if idx < parts.len() {
            parts.remove(idx);
            self.buffer = parts.concat();
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.end_navigation();
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        self.end_navigation();
        let len = self.buffer.graphemes(true).count();
        if self.cursor < len {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_line_start(&mut self) {
        self.end_navigation();
        self.cursor = 0;
    }

    pub fn move_cursor_line_end(&mut self) {
        self.end_navigation();
        self.cursor = self.buffer.graphemes(true).count();
    }

    pub fn move_cursor_word_left(&mut self) {
        self.end_navigation();
        let parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let mut i = self.cursor.min(parts.len());
        while i > 0 && parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        while i > 0 && !parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        self.cursor = i;
    }

    pub fn move_cursor_word_right(&mut self) {
        self.end_navigation();
        let parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let mut i = self.cursor.min(parts.len());
        while i < parts.len() && parts[i].trim().is_empty() {
            i += 1;
        }
        while i < parts.len() && !parts[i].trim().is_empty() {
            i += 1;
        }
        self.cursor = i;
    }

    pub fn delete_prev_word(&mut self) {
        self.end_navigation();
        if self.cursor == 0 {
            return;
        }
        let parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let mut i = self.cursor.min(parts.len());
        while i > 0 && parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        while i > 0 && !parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        let mut newp = parts.clone();
        newp.drain(i..self.cursor.min(newp.len()));
        self.buffer = newp.concat();
        self.cursor = i;
    }

    pub fn kill_to_line_start(&mut self) {
        self.end_navigation();
        let mut parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let idx = self.cursor.min(parts.len());
        parts.drain(..idx);
        self.buffer = parts.concat();
        self.cursor = 0;
    }

    pub fn kill_to_line_end(&mut self) {
        self.end_navigation();
        let mut parts: Vec<&str> = self.buffer.graphemes(true).collect();
        let idx = self.cursor.min(parts.len());
        parts.truncate(idx);
        self.buffer = parts.concat();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(line: &mut InputLine, text: &str) -> Option<String> {
        line.insert_text(text);
        line.submit()
    }

    #[test]
    fn history_records_non_empty_submissions_in_order() {
        let mut line = InputLine::new();
        assert_eq!(submit(&mut line, "a").as_deref(), Some("a"));
        assert_eq!(submit(&mut line, "b").as_deref(), Some("b"));
        assert_eq!(submit(&mut line, "a").as_deref(), Some("a"));
        assert_eq!(line.history(), ["a", "b", "a"]);
    }

    #[test]
    fn empty_submission_changes_nothing() {
        let mut line = InputLine::new();
        assert!(line.submit().is_none());
        assert_eq!(line.history_len(), 0);

        submit(&mut line, "a");
        line.insert_text("   ");
        assert!(line.submit().is_none());
        assert_eq!(line.history_len(), 1);
        assert_eq!(line.history_index(), None);
    }

    #[test]
    fn navigation_walks_history_and_clamps_at_ends() {
        let mut line = InputLine::new();
        submit(&mut line, "a");
        submit(&mut line, "b");

        line.navigate_down();
        assert_eq!(line.buffer(), "");
        assert_eq!(line.history_index(), None);

        line.navigate_up();
        assert_eq!(line.buffer(), "b");
        line.navigate_up();
        assert_eq!(line.buffer(), "a");
        assert_eq!(line.history_index(), Some(0));
        line.navigate_up();
        assert_eq!(line.buffer(), "a");
        assert_eq!(line.history_index(), Some(0));

        line.navigate_down();
        assert_eq!(line.buffer(), "b");
        assert_eq!(line.history_index(), Some(1));
        line.navigate_down();
        assert_eq!(line.buffer(), "");
        assert_eq!(line.history_index(), None);
    }

    #[test]
    fn caret_lands_at_end_of_loaded_entry() {
        let mut line = InputLine::new();
        submit(&mut line, "héllo");
        line.navigate_up();
        assert_eq!(line.cursor(), 5);
    }

    #[test]
    fn any_edit_ends_the_navigation_session() {
        let mut line = InputLine::new();
        submit(&mut line, "a");
        submit(&mut line, "b");

        line.navigate_up();
        line.navigate_up();
        assert_eq!(line.buffer(), "a");
        line.insert_text("x");
        assert_eq!(line.history_index(), None);

        // Up now starts again from the newest entry, not the stale position.
        line.navigate_up();
        assert_eq!(line.buffer(), "b");
    }

    #[test]
    fn cursor_motion_counts_as_an_edit_for_navigation() {
        let mut line = InputLine::new();
        submit(&mut line, "a");
        submit(&mut line, "b");
        line.navigate_up();
        line.navigate_up();
        line.move_cursor_left();
        line.navigate_up();
        assert_eq!(line.buffer(), "b");
    }

    #[test]
    fn submitted_navigation_entry_is_appended_again() {
        let mut line = InputLine::new();
        submit(&mut line, "a");
        line.navigate_up();
        assert_eq!(line.submit().as_deref(), Some("a"));
        assert_eq!(line.history(), ["a", "a"]);
    }

    #[test]
    fn grapheme_editing_round_trip() {
        let mut line = InputLine::new();
        line.insert_text("one two");
        line.move_cursor_word_left();
        line.insert_text("and ");
        assert_eq!(line.buffer(), "one and two");
        line.delete_prev_word();
        assert_eq!(line.buffer(), "one two");
        line.kill_to_line_end();
        assert_eq!(line.buffer(), "one ");
        line.kill_to_line_start();
        assert_eq!(line.buffer(), "");
    }

    #[test]
    fn preloaded_history_navigates_from_newest() {
        let mut line = InputLine::with_history(vec!["old".into(), "new".into()]);
        line.navigate_up();
        assert_eq!(line.buffer(), "new");
    }
}
