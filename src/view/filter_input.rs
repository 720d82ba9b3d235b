//! Filter prompt: line editor state and the widget that draws it.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Editing state of the filter prompt.
///
/// The cursor is a char index, not a byte index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterPrompt {
    /// Prompt closed.
    #[default]
    Closed,
    /// User is typing.
    Editing {
        /// Text typed so far.
        text: String,
        /// Cursor position in chars.
        cursor: usize,
    },
}

impl FilterPrompt {
    /// Open the prompt pre-filled with `current`, cursor at the end.
    pub fn open(current: &str) -> Self {
        FilterPrompt::Editing {
            text: current.to_string(),
            cursor: current.chars().count(),
        }
    }

    /// True while the user is typing.
    pub fn is_editing(&self) -> bool {
        matches!(self, FilterPrompt::Editing { .. })
    }

    /// Insert `ch` at the cursor.
    pub fn insert(&mut self, ch: char) {
        if let FilterPrompt::Editing { text, cursor } = self {
            let at = byte_index(text, *cursor);
            text.insert(at, ch);
            *cursor += 1;
        }
    }

    /// Delete the char before the cursor.
    pub fn backspace(&mut self) {
        if let FilterPrompt::Editing { text, cursor } = self {
            if *cursor == 0 {
                return;
            }
            let at = byte_index(text, *cursor - 1);
            text.remove(at);
            *cursor -= 1;
        }
    }

    /// Move the cursor one char left.
    pub fn left(&mut self) {
        if let FilterPrompt::Editing { cursor, .. } = self {
            *cursor = cursor.saturating_sub(1);
        }
    }

    /// Move the cursor one char right.
    pub fn right(&mut self) {
        if let FilterPrompt::Editing { text, cursor } = self {
            *cursor = (*cursor + 1).min(text.chars().count());
        }
    }

    /// Close the prompt, returning the typed text if it was open.
    pub fn submit(&mut self) -> Option<String> {
        match std::mem::take(self) {
            FilterPrompt::Editing { text, .. } => Some(text),
            FilterPrompt::Closed => None,
        }
    }

    /// Close the prompt, discarding the typed text.
    pub fn cancel(&mut self) {
        *self = FilterPrompt::Closed;
    }
}

fn byte_index(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(index, _)| index)
}

/// One-line widget showing the prompt with a block cursor.
pub struct FilterInput<'a> {
    prompt: &'a FilterPrompt,
}

impl<'a> FilterInput<'a> {
    /// Create new FilterInput widget.
    pub fn new(prompt: &'a FilterPrompt) -> Self {
        Self { prompt }
    }
}

impl Widget for FilterInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let FilterPrompt::Editing { text, cursor } = self.prompt else {
            return;
        };

        let before: String = text.chars().take(*cursor).collect();
        let mut after = text.chars().skip(*cursor);
        let under = after.next().map_or_else(|| " ".to_string(), String::from);
        let rest: String = after.collect();

        let line = Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(before),
            Span::styled(
                under,
                Style::default()
                    .bg(Color::White)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(rest),
        ]);
        buf.set_line(area.left(), area.top(), &line, area.width);
    }
}
