//! Renders [`Record`]s as terminal lines.

use crate::model::{ListItem, Record, ViewError};
use crate::view_state::{ItemView, ItemViewFactory};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::Value;
use std::collections::HashSet;
use unicode_width::UnicodeWidthChar;

/// Handle for one live record view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(u64);

impl ViewHandle {
    /// Raw handle number.
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Ellipsis appended to truncated lines.
const ELLIPSIS: char = '…';

/// Builds a header line plus one line per remaining field for every record.
///
/// The header shows the key and, when configured, the value of a summary
/// field. Lines are truncated to `width` display columns.
#[derive(Debug)]
pub struct LineViewFactory {
    key_field: String,
    summary_field: Option<String>,
    width: usize,
    next_handle: u64,
    live: HashSet<ViewHandle>,
}

impl LineViewFactory {
    /// Factory for records keyed on `key_field`, truncating to `width` columns.
    pub fn new(key_field: impl Into<String>, width: usize) -> Self {
        Self {
            key_field: key_field.into(),
            summary_field: None,
            width,
            next_handle: 0,
            live: HashSet::new(),
        }
    }

    /// Show `field` next to the key in the header line.
    pub fn with_summary_field(mut self, field: impl Into<String>) -> Self {
        self.summary_field = Some(field.into());
        self
    }

    /// Truncation width for views built from now on.
    pub fn set_width(&mut self, width: usize) {
        self.width = width;
    }

    /// Number of views created and not yet reclaimed.
    pub fn live_views(&self) -> usize {
        self.live.len()
    }

    fn header(&self, record: &Record) -> Line<'static> {
        let key = record.key().unwrap_or("<no key>");
        let mut text = format!("▸ {key}");
        if let Some(summary) = self
            .summary_field
            .as_deref()
            .and_then(|field| record.get(field))
        {
            text.push_str("  ");
            text.push_str(&display_value(summary));
        }
        Line::from(Span::styled(
            truncate(&text, self.width),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
    }

    fn field_line(&self, name: &str, value: &Value) -> Line<'static> {
        let text = truncate(&format!("  {name}: {}", display_value(value)), self.width);
        match text.split_once(':') {
            Some((label, rest)) => Line::from(vec![
                Span::styled(format!("{label}:"), Style::default().fg(Color::DarkGray)),
                Span::raw(rest.to_string()),
            ]),
            None => Line::from(Span::styled(text, Style::default().fg(Color::DarkGray))),
        }
    }
}

impl ItemViewFactory<Record> for LineViewFactory {
    type Fragment = Line<'static>;
    type Handle = ViewHandle;

    fn create_view(
        &mut self,
        item: &Record,
    ) -> Result<ItemView<Line<'static>, ViewHandle>, ViewError> {
        if self.width == 0 {
            return Err(ViewError::Build {
                key: item.key().map(str::to_string),
                reason: "zero render width".to_string(),
            });
        }

        let mut output = vec![self.header(item)];
        output.extend(
            item.fields()
                .iter()
                .filter(|(name, _)| {
                    *name != &self.key_field && Some(name.as_str()) != self.summary_field.as_deref()
                })
                .map(|(name, value)| self.field_line(name, value)),
        );

        let handle = ViewHandle(self.next_handle);
        self.next_handle += 1;
        self.live.insert(handle);
        Ok(ItemView::new(output, handle))
    }

    fn reclaim(&mut self, handle: ViewHandle) {
        self.live.remove(&handle);
    }
}

/// Strings render bare; everything else renders as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.replace('\n', " "),
        other => other.to_string(),
    }
}

/// Cut `text` to at most `width` display columns, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(ELLIPSIS);
    out
}
