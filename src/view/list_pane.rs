//! List pane widget and its scroll viewport.
//!
//! The pane shows a window of rendered lines followed by one sentinel row.
//! The sentinel row is the list's load trigger: when it scrolls into the
//! window, the host reports it visible to the gate.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Widget,
};

/// State of the row after the last rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    /// A page is in flight.
    Loading,
    /// More pages may exist.
    More,
    /// The provider returned an empty page.
    End,
}

impl Sentinel {
    fn label(self) -> &'static str {
        match self {
            Sentinel::Loading => "  loading…",
            Sentinel::More => "  ── more ──",
            Sentinel::End => "  ── end of list ──",
        }
    }

    fn style(self) -> Style {
        match self {
            Sentinel::Loading => Style::default().fg(Color::Yellow),
            Sentinel::More => Style::default().fg(Color::DarkGray),
            Sentinel::End => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        }
    }
}

/// Scroll position over `rows` lines plus the sentinel row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListViewport {
    offset: usize,
    height: usize,
    prepended_seen: u64,
}

impl ListViewport {
    /// Viewport at the top with zero height.
    pub fn new() -> Self {
        Self::default()
    }

    /// First visible row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of visible rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Update the visible height after a layout pass.
    pub fn set_height(&mut self, height: usize) {
        self.height = height;
    }

    /// Scroll up by `amount` rows.
    pub fn scroll_up(&mut self, amount: usize) {
        self.offset = self.offset.saturating_sub(amount);
    }

    /// Scroll down by `amount` rows, stopping when the sentinel row is the last visible row.
    pub fn scroll_down(&mut self, amount: usize, rows: usize) {
        self.offset = self.offset.saturating_add(amount).min(max_offset(rows, self.height));
    }

    /// Scroll up by one screen.
    pub fn page_up(&mut self) {
        self.scroll_up(self.height.max(1));
    }

    /// Scroll down by one screen.
    pub fn page_down(&mut self, rows: usize) {
        self.scroll_down(self.height.max(1), rows);
    }

    /// Jump to the first row.
    pub fn to_top(&mut self) {
        self.offset = 0;
    }

    /// Jump so that the sentinel row is visible.
    pub fn to_bottom(&mut self, rows: usize) {
        self.offset = max_offset(rows, self.height);
    }

    /// Keep the offset in range after rows were removed.
    pub fn clamp(&mut self, rows: usize) {
        self.offset = self.offset.min(max_offset(rows, self.height));
    }

    /// Follow lines inserted above the viewport.
    ///
    /// `prepended_total` is the list's running count of prepended lines. When
    /// the reader has scrolled away from the top, the offset moves down by the
    /// newly prepended lines so the visible content stays put. A reset of the
    /// running count (after a hard reset) only re-baselines.
    pub fn anchor(&mut self, prepended_total: u64) {
        if prepended_total < self.prepended_seen {
            self.prepended_seen = prepended_total;
            return;
        }
        let added = prepended_total - self.prepended_seen;
        self.prepended_seen = prepended_total;
        if self.offset > 0 {
            self.offset = self
                .offset
                .saturating_add(usize::try_from(added).unwrap_or(usize::MAX));
        }
    }

    /// True when the sentinel row (index `rows`) falls inside the window.
    pub fn sentinel_visible(&self, rows: usize) -> bool {
        self.height > 0 && rows >= self.offset && rows < self.offset + self.height
    }
}

fn max_offset(rows: usize, height: usize) -> usize {
    // rows + 1 accounts for the sentinel row.
    (rows + 1).saturating_sub(height.max(1))
}

/// Renders a window of lines plus the sentinel row.
pub struct ListPane<'a, I>
where
    I: IntoIterator<Item = &'a Line<'static>>,
{
    lines: I,
    rows: usize,
    offset: usize,
    sentinel: Sentinel,
}

impl<'a, I> ListPane<'a, I>
where
    I: IntoIterator<Item = &'a Line<'static>>,
{
    /// Pane over `rows` lines produced by `lines`, starting at `offset`.
    pub fn new(lines: I, rows: usize, offset: usize, sentinel: Sentinel) -> Self {
        Self {
            lines,
            rows,
            offset,
            sentinel,
        }
    }
}

impl<'a, I> Widget for ListPane<'a, I>
where
    I: IntoIterator<Item = &'a Line<'static>>,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = usize::from(area.height);
        let mut y = area.top();
        for line in self.lines.into_iter().skip(self.offset).take(height) {
            buf.set_line(area.left(), y, line, area.width);
            y += 1;
        }

        let sentinel_row = self.rows.checked_sub(self.offset);
        if sentinel_row.is_some_and(|row| row < height) {
            let line = Line::styled(self.sentinel.label(), self.sentinel.style());
            buf.set_line(area.left(), y, &line, area.width);
        }
    }
}
