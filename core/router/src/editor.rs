//! Editor operations used by the router.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Classification of the current buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BufferKind {
    /// A regular file or scratch buffer.
    Normal,
    /// A terminal buffer, such as the debugger console.
    Terminal,
}

impl BufferKind {
    /// Whether this is a terminal buffer.
    pub fn is_terminal(self) -> bool {
        self == Self::Terminal
    }
}

/// The host editor.
pub trait Editor {
    /// Classifies the current buffer.
    fn current_buffer_kind(&mut self) -> Result<BufferKind>;

    /// The current window's local scroll margin, `0` when it is unset.
    fn window_scroll_off(&mut self) -> Result<u32>;

    /// Sets the current window's local scroll margin.
    fn set_window_scroll_off(&mut self, lines: u32) -> Result<()>;

    /// Moves the cursor to the last line of the current buffer.
    fn move_cursor_to_end(&mut self) -> Result<()>;
}
