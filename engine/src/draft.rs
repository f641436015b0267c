//! Single-line text input with a grapheme cursor.

use std::mem;

use unicode_segmentation::UnicodeSegmentation;

/// Input buffer for the analysis view.
///
/// The cursor counts grapheme clusters, not bytes, so editing never splits a
/// combined character.
#[derive(Debug, Default, Clone)]
pub struct DraftInput {
    text: String,
    cursor: usize,
}

impl DraftInput {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn take_text(&mut self) -> String {
        self.cursor = 0;
        mem::take(&mut self.text)
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = self.cursor.saturating_add(1).min(self.grapheme_count());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.grapheme_count();
    }

    pub fn enter_char(&mut self, new_char: char) {
        let index = self.byte_index_at(self.cursor);
        self.text.insert(index, new_char);
        self.move_cursor_right();
    }

    /// Insert pasted text at the cursor. Newlines become spaces.
    pub fn enter_str(&mut self, pasted: &str) {
        let index = self.byte_index_at(self.cursor);
        let cleaned: String = pasted
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        let added = cleaned.graphemes(true).count();
        self.text.insert_str(index, &cleaned);
        self.cursor = (self.cursor + added).min(self.grapheme_count());
    }

    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let start = self.byte_index_at(self.cursor - 1);
        let end = self.byte_index_at(self.cursor);
        self.text.replace_range(start..end, "");
        self.move_cursor_left();
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor >= self.grapheme_count() {
            return;
        }

        let start = self.byte_index_at(self.cursor);
        let end = self.byte_index_at(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn delete_word_backwards(&mut self) {
        while self.cursor > 0 && self.grapheme_is_whitespace(self.cursor - 1) {
            self.delete_char();
        }
        while self.cursor > 0 && !self.grapheme_is_whitespace(self.cursor - 1) {
            self.delete_char();
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    fn grapheme_is_whitespace(&self, index: usize) -> bool {
        self.text
            .graphemes(true)
            .nth(index)
            .is_some_and(|grapheme| grapheme.chars().all(char::is_whitespace))
    }

    fn byte_index_at(&self, grapheme_index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::DraftInput;

    fn typed(text: &str) -> DraftInput {
        let mut draft = DraftInput::default();
        for c in text.chars() {
            draft.enter_char(c);
        }
        draft
    }

    #[test]
    fn edits_at_cursor() {
        let mut draft = typed("helo");
        draft.move_cursor_left();
        draft.enter_char('l');
        assert_eq!(draft.text(), "hello");
        assert_eq!(draft.cursor(), 4);

        draft.move_cursor_end();
        draft.delete_char();
        assert_eq!(draft.text(), "hell");

        draft.move_cursor_home();
        draft.delete_char_forward();
        assert_eq!(draft.text(), "ell");
    }

    #[test]
    fn cursor_counts_graphemes() {
        let mut draft = typed("e\u{301}x");
        assert_eq!(draft.cursor(), 2);
        draft.move_cursor_left();
        draft.delete_char();
        assert_eq!(draft.text(), "x");
    }

    #[test]
    fn deletes_previous_word() {
        let mut draft = typed("check this  ");
        draft.delete_word_backwards();
        assert_eq!(draft.text(), "check ");
        draft.delete_word_backwards();
        assert_eq!(draft.text(), "");
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut draft = typed("[]");
        draft.move_cursor_left();
        draft.enter_str("a\nb");
        assert_eq!(draft.text(), "[a b]");
        assert_eq!(draft.cursor(), 4);
    }

    #[test]
    fn blank_and_take() {
        let mut draft = typed("   ");
        assert!(draft.is_blank());
        draft.clear();
        draft.enter_str("https://example.com");
        assert!(!draft.is_blank());
        assert_eq!(draft.take_text(), "https://example.com");
        assert_eq!(draft.cursor(), 0);
        assert!(draft.text().is_empty());
    }
}
