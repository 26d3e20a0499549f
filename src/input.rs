use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line editable text with a cursor. The cursor counts characters,
/// not bytes, so multi-byte input edits cleanly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        self.cursor = self.cursor.min(self.len());
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        self.cursor = self.cursor.min(self.len());
        if self.cursor > 0 {
            let at = self.byte_index(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.min(self.len()).saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    /// Applies an editing key. Returns false for keys the field does not use,
    /// so the caller can treat them as navigation.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.backspace();
                true
            }
            KeyCode::Delete => {
                self.delete();
                true
            }
            KeyCode::Left => {
                self.move_left();
                true
            }
            KeyCode::Right => {
                self.move_right();
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.len();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_typing_appends_and_advances_cursor() {
        let mut field = TextField::new();
        for c in "Hello".chars() {
            field.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(field.value(), "Hello");
        assert_eq!(field.cursor(), 5);
    }

    #[test]
    fn test_insert_at_cursor_position() {
        let mut field = TextField::with_value("Helo");
        field.move_left();
        field.insert('l');
        assert_eq!(field.value(), "Hello");
        assert_eq!(field.cursor(), 4);

        field.handle_key(key(KeyCode::Home));
        field.insert('W');
        assert_eq!(field.value(), "WHello");
        assert_eq!(field.cursor(), 1);
    }

    #[test]
    fn test_backspace_deletes_before_cursor() {
        let mut field = TextField::with_value("Hello World");
        for _ in 0..6 {
            field.move_left();
        }
        field.backspace();
        assert_eq!(field.value(), "Hell World");
        assert_eq!(field.cursor(), 4);

        field.handle_key(key(KeyCode::Home));
        field.backspace();
        assert_eq!(field.value(), "Hell World");
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn test_delete_removes_under_cursor() {
        let mut field = TextField::with_value("abc");
        field.handle_key(key(KeyCode::Home));
        field.handle_key(key(KeyCode::Delete));
        assert_eq!(field.value(), "bc");
        field.handle_key(key(KeyCode::End));
        field.handle_key(key(KeyCode::Delete));
        assert_eq!(field.value(), "bc");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut field = TextField::new();
        field.move_left();
        assert_eq!(field.cursor(), 0);
        field.move_right();
        assert_eq!(field.cursor(), 0);

        let mut field = TextField::with_value("Hi");
        for _ in 0..10 {
            field.move_right();
        }
        assert_eq!(field.cursor(), 2);
        for _ in 0..10 {
            field.move_left();
        }
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn test_multibyte_characters() {
        let mut field = TextField::with_value("Matemática");
        field.backspace();
        field.backspace();
        assert_eq!(field.value(), "Matemáti");
        field.move_left();
        field.backspace();
        assert_eq!(field.value(), "Matemái");
        assert_eq!(field.cursor(), 6);
    }

    #[test]
    fn test_control_chars_and_navigation_keys_are_not_consumed() {
        let mut field = TextField::new();
        assert!(!field.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(!field.handle_key(key(KeyCode::Enter)));
        assert!(!field.handle_key(key(KeyCode::Tab)));
        assert!(!field.handle_key(key(KeyCode::Esc)));
        assert!(field.value().is_empty());
    }

    #[test]
    fn test_blank_detection() {
        assert!(TextField::with_value("   ").is_blank());
        assert!(!TextField::with_value(" a ").is_blank());
    }
}
