//! Input field handling for the terminal user interface.

/// A single-line text input with a cursor.
///
/// The cursor is a character index, not a byte index, so editing text
/// with multi-byte characters can never split a UTF-8 boundary.
#[derive(Clone)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self {
            value: String::new(),
            cursor: 0,
        }
    }

    /// Create an input field with initial text, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Move cursor one position to the left.
    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move cursor one position to the right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Jump to the start of the line.
    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    /// Jump to the end of the line.
    pub fn move_cursor_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Reset to an empty value.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_backspace_with_multibyte_text() {
        let mut field = InputField::with_value("café");
        field.handle_backspace();
        assert_eq!(field.value, "caf");
        field.handle_char('é');
        field.handle_char('!');
        assert_eq!(field.value, "café!");
    }

    #[test]
    fn delete_at_cursor_inside_multibyte_text() {
        let mut field = InputField::with_value("日本語");
        field.move_cursor_home();
        field.handle_delete();
        assert_eq!(field.value, "本語");
        assert_eq!(field.cursor, 0);
    }

    #[test]
    fn cursor_stays_within_bounds() {
        let mut field = InputField::new();
        field.move_cursor_left();
        field.move_cursor_right();
        assert_eq!(field.cursor, 0);
        field.handle_char('a');
        field.move_cursor_right();
        assert_eq!(field.cursor, 1);
    }
}
