//! UTF-8 safe single-line text buffer with cursor management.
//!
//! The value editor keeps its pending text here. Every editing primitive keeps
//! the cursor on a character boundary.

use unicode_width::UnicodeWidthChar;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- Getters -----
    pub fn input(&self) -> &str {
        &self.input
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Display width of the text before the cursor, in terminal columns.
    pub fn cursor_columns(&self) -> usize {
        self.input[..self.cursor].chars().map(|c| c.width().unwrap_or(0)).sum()
    }

    // ----- Setters -----
    pub fn set_input<S: Into<String>>(&mut self, s: S) {
        self.input = s.into();
        self.cursor = self.input.len();
    }

    /// Places the cursor at `cursor`, snapping back to the previous boundary.
    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.input.len());
        while !self.input.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    /// Places the cursor at the character under terminal column `column`.
    pub fn set_cursor_from_column(&mut self, column: usize) {
        let mut cumulative = 0usize;
        for (byte_index, ch) in self.input.char_indices() {
            if cumulative >= column {
                self.cursor = byte_index;
                return;
            }
            cumulative += ch.width().unwrap_or(0);
        }
        self.cursor = self.input.len();
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    // ----- Editing primitives (UTF-8 safe) -----

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= prev.len_utf8();
        }
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    /// Insert a char at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert a string at the cursor (bracketed paste).
    pub fn insert_str(&mut self, s: &str) {
        self.input.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Backspace the char immediately before the cursor.
    pub fn backspace(&mut self) {
        if let Some(prev) = self.input[..self.cursor].chars().next_back() {
            let start = self.cursor - prev.len_utf8();
            self.input.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.input.drain(self.cursor..self.cursor + next.len_utf8());
        }
    }
}
