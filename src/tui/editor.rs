//! Minimal multi-line text editor backing the TUI buffer.
//!
//! Positions are in characters, not bytes. There is no partial selection:
//! either the whole buffer is selected (select-all) or nothing is, in which
//! case copy and cut act on the cursor line.

use crate::app::LineBuffer;

#[derive(Debug, Default)]
pub struct Editor {
    lines: Vec<String>,
    row: usize,
    col: usize,
    select_all: bool,
    scroll_row: usize,
    scroll_col: usize,
    view_height: usize,
}

impl LineBuffer for Editor {
    fn lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.row = 0;
        self.col = 0;
        self.scroll_row = 0;
        self.scroll_col = 0;
        self.select_all = false;
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }
}

fn byte_index(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map(|(i, _)| i).unwrap_or(s.len())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl Editor {
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn is_all_selected(&self) -> bool {
        self.select_all
    }

    pub fn raw_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn scroll(&self) -> (usize, usize) {
        (self.scroll_row, self.scroll_col)
    }

    /// Make sure there is a line under the cursor before editing.
    fn ensure_line(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
            self.row = 0;
            self.col = 0;
        }
    }

    fn clamp_col(&mut self) {
        let len = self.lines.get(self.row).map(|l| char_len(l)).unwrap_or(0);
        self.col = self.col.min(len);
    }

    /// Typing over a select-all replaces the whole buffer.
    fn take_selection(&mut self) {
        if self.select_all {
            self.lines.clear();
            self.row = 0;
            self.col = 0;
            self.select_all = false;
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.take_selection();
        self.ensure_line();
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        line.insert(at, c);
        self.col += 1;
    }

    pub fn insert_newline(&mut self) {
        self.take_selection();
        self.ensure_line();
        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        let rest = line.split_off(at);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.select_all {
            self.take_selection();
            return;
        }
        if self.lines.is_empty() {
            return;
        }
        if self.col > 0 {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col - 1);
            line.remove(at);
            self.col -= 1;
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            let prev = &mut self.lines[self.row];
            self.col = char_len(prev);
            prev.push_str(&current);
        }
    }

    pub fn delete(&mut self) {
        if self.select_all {
            self.take_selection();
            return;
        }
        if self.lines.is_empty() {
            return;
        }
        let len = char_len(&self.lines[self.row]);
        if self.col < len {
            let line = &mut self.lines[self.row];
            let at = byte_index(line, self.col);
            line.remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        self.select_all = false;
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = char_len(&self.lines[self.row]);
        }
    }

    pub fn move_right(&mut self) {
        self.select_all = false;
        let Some(line) = self.lines.get(self.row) else {
            return;
        };
        if self.col < char_len(line) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self, n: usize) {
        self.select_all = false;
        self.row = self.row.saturating_sub(n);
        self.clamp_col();
    }

    pub fn move_down(&mut self, n: usize) {
        self.select_all = false;
        let last = self.lines.len().saturating_sub(1);
        self.row = (self.row + n).min(last);
        self.clamp_col();
    }

    pub fn page_up(&mut self) {
        self.move_up(self.view_height.max(1));
    }

    pub fn page_down(&mut self) {
        self.move_down(self.view_height.max(1));
    }

    pub fn home(&mut self) {
        self.select_all = false;
        self.col = 0;
    }

    pub fn end(&mut self) {
        self.select_all = false;
        self.col = self.lines.get(self.row).map(|l| char_len(l)).unwrap_or(0);
    }

    pub fn select_all(&mut self) {
        self.select_all = !self.lines.is_empty();
    }

    pub fn deselect(&mut self) {
        self.select_all = false;
    }

    /// Text that copy would place on the clipboard.
    pub fn selected_text(&self) -> Option<String> {
        if self.select_all {
            // Same shape as the buffer's text: no newline after the last line.
            return Some(self.lines.join("\n"));
        }
        self.lines.get(self.row).map(|l| format!("{l}\n"))
    }

    /// Remove and return the selection (the whole buffer or the cursor line).
    pub fn cut(&mut self) -> Option<String> {
        let text = self.selected_text()?;
        if self.select_all {
            self.take_selection();
        } else {
            self.lines.remove(self.row);
            if self.row >= self.lines.len() {
                self.row = self.lines.len().saturating_sub(1);
            }
            self.col = 0;
        }
        Some(text)
    }

    /// Insert clipboard text at the cursor, splitting on line breaks.
    pub fn paste(&mut self, text: &str) {
        self.take_selection();
        self.ensure_line();
        let normalized = text.replace("\r\n", "\n");
        let mut pieces = normalized.split('\n');
        let Some(first) = pieces.next() else {
            return;
        };

        let line = &mut self.lines[self.row];
        let at = byte_index(line, self.col);
        let tail = line.split_off(at);
        line.push_str(first);
        self.col += char_len(first);

        for piece in pieces {
            self.row += 1;
            self.lines.insert(self.row, piece.to_string());
            self.col = char_len(piece);
        }
        self.lines[self.row].push_str(&tail);
    }

    /// Adjust the scroll offsets so the cursor stays inside a
    /// `height` x `width` viewport.
    pub fn scroll_to_cursor(&mut self, height: usize, width: usize) {
        self.view_height = height;
        if height == 0 || width == 0 {
            return;
        }
        if self.row < self.scroll_row {
            self.scroll_row = self.row;
        } else if self.row >= self.scroll_row + height {
            self.scroll_row = self.row + 1 - height;
        }
        if self.col < self.scroll_col {
            self.scroll_col = self.col;
        } else if self.col >= self.scroll_col + width {
            self.scroll_col = self.col + 1 - width;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(lines: &[&str]) -> Editor {
        let mut e = Editor::default();
        e.set_lines(lines.iter().map(|s| s.to_string()).collect());
        e
    }

    #[test]
    fn typing_into_empty_buffer_creates_a_line() {
        let mut e = Editor::default();
        assert_eq!(e.line_count(), 0);
        for c in "hi".chars() {
            e.insert_char(c);
        }
        assert_eq!(e.lines(), vec!["hi"]);
        assert_eq!(e.cursor(), (0, 2));
    }

    #[test]
    fn newline_splits_and_backspace_joins() {
        let mut e = editor(&["héllo"]);
        e.move_right();
        e.move_right();
        e.insert_newline();
        assert_eq!(e.lines(), vec!["hé", "llo"]);
        assert_eq!(e.cursor(), (1, 0));

        e.backspace();
        assert_eq!(e.lines(), vec!["héllo"]);
        assert_eq!(e.cursor(), (0, 2));
    }

    #[test]
    fn delete_at_end_of_line_joins_next() {
        let mut e = editor(&["ab", "cd"]);
        e.end();
        e.delete();
        assert_eq!(e.lines(), vec!["abcd"]);
    }

    #[test]
    fn vertical_movement_clamps_column() {
        let mut e = editor(&["long line", "ab"]);
        e.end();
        e.move_down(1);
        assert_eq!(e.cursor(), (1, 2));
        e.move_down(5);
        assert_eq!(e.cursor(), (1, 2));
    }

    #[test]
    fn select_all_then_cut_empties_buffer() {
        let mut e = editor(&["one", "two"]);
        e.select_all();
        assert_eq!(e.selected_text().as_deref(), Some("one\ntwo"));
        assert_eq!(e.cut().as_deref(), Some("one\ntwo"));
        assert_eq!(e.line_count(), 0);
        assert!(!e.is_all_selected());
    }

    #[test]
    fn cut_without_selection_takes_current_line() {
        let mut e = editor(&["one", "two", "three"]);
        e.move_down(2);
        assert_eq!(e.cut().as_deref(), Some("three\n"));
        assert_eq!(e.lines(), vec!["one", "two"]);
        assert_eq!(e.cursor(), (1, 0));
    }

    #[test]
    fn paste_multi_line_text() {
        let mut e = editor(&["[]"]);
        e.move_right();
        e.paste("a\r\nb\nc");
        assert_eq!(e.lines(), vec!["[a", "b", "c]"]);
        assert_eq!(e.cursor(), (2, 1));
    }

    #[test]
    fn typing_replaces_select_all() {
        let mut e = editor(&["old", "text"]);
        e.select_all();
        e.insert_char('x');
        assert_eq!(e.lines(), vec!["x"]);
    }

    #[test]
    fn set_lines_resets_cursor() {
        let mut e = editor(&["a", "b", "c"]);
        e.move_down(2);
        e.set_lines(vec!["z".to_string()]);
        assert_eq!(e.cursor(), (0, 0));
        assert_eq!(e.scroll(), (0, 0));
    }

    #[test]
    fn scroll_follows_cursor() {
        let lines: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let mut e = Editor::default();
        e.set_lines(lines);
        e.scroll_to_cursor(10, 20);
        e.page_down();
        e.scroll_to_cursor(10, 20);
        assert_eq!(e.cursor().0, 10);
        assert_eq!(e.scroll().0, 1);
        e.move_up(10);
        e.scroll_to_cursor(10, 20);
        assert_eq!(e.scroll().0, 0);
    }
}
