//! Domain-level keyboard actions independent of key bindings.

/// User intent in the list console.
///
/// The mapping from `crossterm::event::KeyEvent` to `KeyAction` is handled by
/// `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Scroll up by one line. Default: k/↑
    ScrollUp,
    /// Scroll down by one line. Default: j/↓
    ScrollDown,
    /// Scroll up by one viewport height. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one viewport height. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the first line. Default: g/Home
    ScrollToTop,
    /// Jump to the last loaded line. Default: G/End
    ScrollToBottom,

    /// Open the filter prompt. Default: /
    EditFilter,
    /// Reset the filter to the empty string. Default: Ctrl+l
    ClearFilter,

    /// Re-fetch the displayed window without clearing it. Default: r
    Refresh,
    /// Discard everything and reload from the first page. Default: R
    Reset,

    /// Quit the application. Default: q/Ctrl+c
    Quit,
}
