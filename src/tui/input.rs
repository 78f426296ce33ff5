//! Single-line text input used by the login form and the path prompt.

use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

#[derive(Default, Clone)]
pub struct TextInput {
    pub value: String,
    /// Cursor position in characters
    pub cursor: usize,
    /// Render as `*` (passwords)
    pub masked: bool,
}

impl TextInput {
    pub fn masked() -> Self {
        Self {
            masked: true,
            ..Self::default()
        }
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let end = self.byte_offset(self.cursor);
        let start = self.byte_offset(self.cursor - 1);
        self.value.drain(start..end);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.value.chars().count() {
            return;
        }
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.value.drain(start..end);
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Take the trimmed value, leaving the input empty. `None` if blank.
    pub fn take(&mut self) -> Option<String> {
        let text = self.value.trim().to_string();
        self.clear();
        (!text.is_empty()).then_some(text)
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn display(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }

    /// Render `label value` on one line; places the terminal cursor when focused.
    pub fn render(&self, frame: &mut Frame, area: Rect, label: &str, focused: bool) {
        let label_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let line = Line::from(vec![
            Span::styled(format!("{} ", label), label_style),
            Span::raw(self.display()),
        ]);
        frame.render_widget(Paragraph::new(line), area);

        if focused {
            let x = area.x + label.chars().count() as u16 + 1 + self.cursor as u16;
            frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(1)), area.y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextInput {
        let mut input = TextInput::default();
        text.chars().for_each(|c| input.insert(c));
        input
    }

    #[test]
    fn test_insert_and_edit_in_middle() {
        let mut input = typed("tems");
        input.left();
        input.left();
        input.insert('a');
        assert_eq!(input.value, "teams");
        input.backspace();
        input.delete();
        assert_eq!(input.value, "tes");
        assert_eq!(input.cursor, 2);
    }

    #[test]
    fn test_multibyte_cursor() {
        let mut input = typed("équipe");
        input.home();
        input.delete();
        assert_eq!(input.value, "quipe");
        input.end();
        input.right();
        assert_eq!(input.cursor, 5);
    }

    #[test]
    fn test_take_trims_and_clears() {
        let mut input = typed("  /teams ");
        assert_eq!(input.take().as_deref(), Some("/teams"));
        assert!(input.value.is_empty());
        assert_eq!(input.take(), None);
    }

    #[test]
    fn test_masked_display() {
        let mut input = TextInput::masked();
        input.insert('p');
        input.insert('w');
        assert_eq!(input.display(), "**");
    }
}
