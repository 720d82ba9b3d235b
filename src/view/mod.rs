//! TUI rendering and terminal management (impure shell)

mod filter_input;
mod line_factory;
mod list_pane;
mod viewport_gate;


pub use filter_input::{FilterInput, FilterPrompt};
pub use line_factory::{truncate, LineViewFactory, ViewHandle};
pub use list_pane::{ListPane, ListViewport, Sentinel};
pub use viewport_gate::ViewportGate;

use crate::config::keybindings::KeyBindings;
use crate::integration::PagedList;
use crate::model::{KeyAction, Record, TriggerRef};
use crate::source::{ItemsProvider, JsonlFileProvider};
use crate::state::ListConfig;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use std::cell::RefCell;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Delay between frames when no input is pending.
const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// The single load sentinel of the console.
const LOAD_TRIGGER: TriggerRef = TriggerRef::new(0);

/// Width used when the terminal reports none.
const FALLBACK_WIDTH: u16 = 80;

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// Settings the console needs beyond the list itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Page size and auto-refresh interval.
    pub list: ListConfig,
    /// Record field used as the unique key.
    pub key_field: String,
    /// Record field shown next to the key.
    pub summary_field: Option<String>,
    /// Filter applied before the first page loads.
    pub initial_filter: Option<String>,
}

/// Everything the status line and pane need from the session, read in one borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ListSnapshot {
    len: usize,
    rows: usize,
    page: usize,
    generation: u64,
    prepended: u64,
    filter: Option<String>,
    loading: bool,
    refreshing: bool,
    exhausted: bool,
}

impl ListSnapshot {
    fn sentinel(&self) -> Sentinel {
        if self.loading {
            Sentinel::Loading
        } else if self.exhausted {
            Sentinel::End
        } else {
            Sentinel::More
        }
    }
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend, and over the
/// provider so tests can drive it from memory.
pub struct TuiApp<B, P>
where
    B: Backend,
    P: ItemsProvider<Item = Record> + 'static,
{
    terminal: Terminal<B>,
    list: PagedList<P, LineViewFactory, ViewportGate>,
    gate: Rc<ViewportGate>,
    viewport: ListViewport,
    prompt: FilterPrompt,
    key_bindings: KeyBindings,
    /// Last page-load failure, written by the list's error sink.
    last_error: Rc<RefCell<Option<String>>>,
    /// Feedback for the last user command (e.g. a rejected refresh).
    notice: Option<String>,
    seen_generation: u64,
}

impl<B, P> TuiApp<B, P>
where
    B: Backend,
    P: ItemsProvider<Item = Record> + 'static,
{
    /// Mount a list over `provider` and draw into `terminal`.
    ///
    /// Must be called inside a `tokio::task::LocalSet`.
    pub fn with_terminal(terminal: Terminal<B>, provider: P, settings: AppSettings) -> Self {
        let width = match terminal.size() {
            Ok(size) if size.width > 0 => size.width,
            _ => FALLBACK_WIDTH,
        };
        let mut factory = LineViewFactory::new(settings.key_field, usize::from(width));
        if let Some(field) = settings.summary_field {
            factory = factory.with_summary_field(field);
        }

        let gate = Rc::new(ViewportGate::new());
        let list = PagedList::mount(
            provider,
            factory,
            Rc::clone(&gate),
            LOAD_TRIGGER,
            settings.list,
        );

        let last_error = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&last_error);
        list.on_load_error(move |err| {
            *sink.borrow_mut() = Some(err.to_string());
        });

        if let Some(filter) = settings.initial_filter.as_deref() {
            list.set_filter(filter);
        }

        let seen_generation = list.with_session(|s| s.generation());
        Self {
            terminal,
            list,
            gate,
            viewport: ListViewport::new(),
            prompt: FilterPrompt::Closed,
            key_bindings: KeyBindings::default(),
            last_error,
            notice: None,
            seen_generation,
        }
    }

    /// Run the main event loop until the user quits.
    pub async fn run(&mut self) -> Result<(), TuiError> {
        loop {
            self.frame()?;

            while event::poll(Duration::ZERO)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key) {
                        return Ok(());
                    }
                }
            }

            tokio::time::sleep(FRAME_INTERVAL).await;
        }
    }

    /// Draw one frame, then report the sentinel's visibility to the gate.
    ///
    /// The gate may start a page load; it runs as a local task.
    pub fn frame(&mut self) -> Result<(), TuiError> {
        self.draw()?;
        self.observe_sentinel();
        Ok(())
    }

    /// Tear the list down.
    pub fn shutdown(self) {
        self.list.teardown();
    }

    /// The mounted list.
    pub fn list(&self) -> &PagedList<P, LineViewFactory, ViewportGate> {
        &self.list
    }

    /// The terminal being drawn into.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Current scroll position.
    pub fn viewport(&self) -> &ListViewport {
        &self.viewport
    }

    fn snapshot(&self) -> ListSnapshot {
        self.list.with_session(|s| ListSnapshot {
            len: s.len(),
            rows: s.fragment_count(),
            page: s.current_page(),
            generation: s.generation(),
            prepended: s.prepended_fragments(),
            filter: s.filter().filter(|f| !f.is_empty()).map(str::to_string),
            loading: s.is_loading(),
            refreshing: s.is_refreshing(),
            exhausted: !s.has_trigger(),
        })
    }

    fn draw(&mut self) -> Result<(), TuiError> {
        let snapshot = self.snapshot();
        self.viewport.anchor(snapshot.prepended);

        let status = status_line(
            &snapshot,
            self.last_error.borrow().as_deref(),
            self.notice.as_deref(),
        );
        let list = &self.list;
        let viewport = &mut self.viewport;
        let prompt = &self.prompt;

        self.terminal.draw(|frame| {
            let [list_area, status_area] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

            viewport.set_height(usize::from(list_area.height));
            viewport.clamp(snapshot.rows);
            let offset = viewport.offset();

            list.with_session(|s| {
                let pane = ListPane::new(s.fragments(), snapshot.rows, offset, snapshot.sentinel());
                frame.render_widget(pane, list_area);
            });

            if prompt.is_editing() {
                frame.render_widget(FilterInput::new(prompt), status_area);
            } else {
                frame.render_widget(Paragraph::new(status), status_area);
            }
        })?;
        Ok(())
    }

    fn observe_sentinel(&mut self) {
        let (generation, rows) = self
            .list
            .with_session(|s| (s.generation(), s.fragment_count()));
        if generation != self.seen_generation {
            // New layout: a sentinel that stayed visible counts as a fresh sighting.
            self.seen_generation = generation;
            self.gate.invalidate(LOAD_TRIGGER);
        }
        self.gate
            .observe(LOAD_TRIGGER, self.viewport.sentinel_visible(rows));
    }

    fn rows(&self) -> usize {
        self.list.with_session(|s| s.fragment_count())
    }

    /// Handle a key press. Returns `true` when the user quits.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Ctrl+C should always quit, even if not in bindings
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if self.prompt.is_editing() {
            self.handle_prompt_key(key);
            return false;
        }

        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };
        self.apply(action)
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.prompt.insert(ch);
            }
            KeyCode::Backspace => self.prompt.backspace(),
            KeyCode::Left => self.prompt.left(),
            KeyCode::Right => self.prompt.right(),
            KeyCode::Esc => self.prompt.cancel(),
            KeyCode::Enter => {
                if let Some(filter) = self.prompt.submit() {
                    self.change_filter(&filter);
                }
            }
            _ => {}
        }
    }

    fn apply(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::ScrollUp => self.viewport.scroll_up(1),
            KeyAction::ScrollDown => {
                let rows = self.rows();
                self.viewport.scroll_down(1, rows);
            }
            KeyAction::PageUp => self.viewport.page_up(),
            KeyAction::PageDown => {
                let rows = self.rows();
                self.viewport.page_down(rows);
            }
            KeyAction::ScrollToTop => self.viewport.to_top(),
            KeyAction::ScrollToBottom => {
                let rows = self.rows();
                self.viewport.to_bottom(rows);
            }
            KeyAction::EditFilter => {
                let current = self
                    .list
                    .with_session(|s| s.filter().unwrap_or_default().to_string());
                self.prompt = FilterPrompt::open(&current);
            }
            KeyAction::ClearFilter => {
                if self.list.with_session(|s| s.filter().is_some()) {
                    self.change_filter("");
                }
            }
            KeyAction::Refresh => {
                self.notice = match self.list.trigger_update(true) {
                    Ok(()) => None,
                    Err(err) => Some(err.to_string()),
                };
            }
            KeyAction::Reset => {
                if let Err(err) = self.list.trigger_update(false) {
                    self.notice = Some(err.to_string());
                } else {
                    self.after_reset();
                }
            }
            KeyAction::Quit => return true,
        }
        false
    }

    fn change_filter(&mut self, filter: &str) {
        if self.list.set_filter(filter) {
            info!(filter, "filter applied");
            self.after_reset();
        }
    }

    fn after_reset(&mut self) {
        self.viewport.to_top();
        self.notice = None;
        self.last_error.borrow_mut().take();
    }
}

fn status_line(
    snapshot: &ListSnapshot,
    error: Option<&str>,
    notice: Option<&str>,
) -> Line<'static> {
    let mut parts = vec![format!("{} items", snapshot.len), format!("page {}", snapshot.page)];
    if let Some(filter) = &snapshot.filter {
        parts.push(format!("filter {filter:?}"));
    }
    if snapshot.loading {
        parts.push("loading".to_string());
    }
    if snapshot.refreshing {
        parts.push("refreshing".to_string());
    }

    let mut spans = vec![Span::styled(parts.join(" · "), Style::default().fg(Color::Gray))];
    if let Some(message) = error.or(notice) {
        spans.push(Span::raw(" · "));
        spans.push(Span::styled(message.to_string(), Style::default().fg(Color::Red)));
    }
    Line::from(spans)
}

/// Open `path` as a paginated list in the terminal.
///
/// Runs on a current-thread tokio runtime inside a `LocalSet`. The terminal
/// is restored and the list torn down on every exit path.
///
/// # Errors
///
/// Returns `TuiError::Io` when the terminal or runtime cannot be set up.
pub fn run(path: PathBuf, settings: AppSettings) -> Result<(), TuiError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let local = tokio::task::LocalSet::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout));

    let result = match terminal {
        Ok(terminal) => {
            let provider = JsonlFileProvider::new(path).with_key_field(settings.key_field.clone());
            local.block_on(&runtime, run_app(terminal, provider, settings))
        }
        Err(err) => Err(err.into()),
    };

    restore_terminal()?;
    result
}

async fn run_app(
    terminal: Terminal<CrosstermBackend<Stdout>>,
    provider: JsonlFileProvider,
    settings: AppSettings,
) -> Result<(), TuiError> {
    let mut app = TuiApp::with_terminal(terminal, provider, settings);
    let result = app.run().await;
    debug!("event loop finished; tearing down list");
    app.shutdown();
    result
}

/// Restore terminal to normal state
///
/// Disables raw mode and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
