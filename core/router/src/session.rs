//! Typed surface of the external debugger session.
//!
//! The session itself lives on the editor side together with its parser,
//! breakpoint store, sign management and keymaps. The router only sees the
//! capabilities below, one trait per sub-object, and never formats
//! interpreter call strings itself.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Parameters a session is created with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSpec {
    /// Debugger backend identifier, e.g. `gdb`, `lldb`, `pdb`.
    pub backend: String,
    /// Command launching the proxy between the debugger and the editor.
    pub proxy_cmd: String,
    /// Command launching the debugger client.
    pub client_cmd: String,
}

impl SessionSpec {
    /// Creates a new session spec.
    pub fn new(
        backend: impl Into<String>,
        proxy_cmd: impl Into<String>,
        client_cmd: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.into(),
            proxy_cmd: proxy_cmd.into(),
            client_cmd: client_cmd.into(),
        }
    }
}

/// Named session-level commands accepted by [`DebugSession::send`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionCommand {
    /// Delete every breakpoint known to the debugger.
    DeleteBreakpoints,
}

impl SessionCommand {
    /// The name the session knows this command by.
    pub fn name(self) -> &'static str {
        match self {
            Self::DeleteBreakpoints => "delete_breakpoints",
        }
    }
}

/// A value read from the session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    #[allow(missing_docs)]
    Bool(bool),
    #[allow(missing_docs)]
    Integer(i64),
    #[allow(missing_docs)]
    Text(String),
    /// Any other JSON value (a float, an array, a table).
    Other(serde_json::Value),
}

impl ConfigValue {
    /// Interprets the value as a line count.
    ///
    /// Integers and numeric strings convert; anything else, including
    /// negative numbers, does not.
    pub fn as_line_count(&self) -> Option<u32> {
        match self {
            Self::Integer(n) => u32::try_from(*n).ok(),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) | Self::Other(_) => None,
        }
    }
}

/// Debugger output parser state.
///
/// `running` and `paused` are polled independently; implementations are not
/// required to keep them mutually exclusive.
pub trait Parser {
    /// Whether the debuggee is executing.
    fn is_running(&mut self) -> Result<bool>;

    /// Whether the debuggee is stopped at a known location.
    fn is_paused(&mut self) -> Result<bool>;
}

/// Connection to the debugger client.
pub trait Client {
    /// Interrupts the running debuggee.
    fn interrupt(&mut self) -> Result<()>;
}

/// The current-line indicator.
pub trait Cursor {
    #[allow(missing_docs)]
    fn show(&mut self) -> Result<()>;
    #[allow(missing_docs)]
    fn hide(&mut self) -> Result<()>;
}

/// The breakpoint store.
pub trait Breakpoints {
    /// Removes every breakpoint sign from the editor.
    fn clear_signs(&mut self) -> Result<()>;
}

/// Window management of the session.
pub trait Win {
    /// Asks the debugger for the breakpoint list and refreshes the signs.
    fn query_breakpoints(&mut self) -> Result<()>;

    /// Whether the jump window is the current window.
    fn is_jump_window_active(&mut self) -> Result<bool>;

    /// Opens the location list filled by running `cmd`.
    ///
    /// `kind` is the list tag and `mods` the window modifiers typed by
    /// the user, both passed along untouched.
    fn lopen(&mut self, cmd: &str, kind: &str, mods: &str) -> Result<()>;
}

/// Debugger key bindings.
pub trait Keymaps {
    /// Binds the debugger keymaps to the current buffer.
    fn dispatch_set(&mut self) -> Result<()>;

    /// Unbinds the debugger keymaps from the current buffer.
    fn dispatch_unset(&mut self) -> Result<()>;
}

/// Backend-specific command translation.
pub trait Backend {
    /// Translates a gdb-flavoured raw command into the backend's own syntax.
    fn translate_command(&mut self, raw: &str) -> Result<String>;
}

/// Session configuration lookups.
pub trait Config {
    /// Reads a configuration option; `None` when it is not set.
    fn get(&mut self, name: &str) -> Result<Option<ConfigValue>>;
}

/// A live debugger session.
pub trait DebugSession {
    #[allow(missing_docs)]
    fn parser(&mut self) -> &mut dyn Parser;
    #[allow(missing_docs)]
    fn client(&mut self) -> &mut dyn Client;
    #[allow(missing_docs)]
    fn cursor(&mut self) -> &mut dyn Cursor;
    #[allow(missing_docs)]
    fn win(&mut self) -> &mut dyn Win;
    #[allow(missing_docs)]
    fn breakpoint(&mut self) -> &mut dyn Breakpoints;
    #[allow(missing_docs)]
    fn keymaps(&mut self) -> &mut dyn Keymaps;
    #[allow(missing_docs)]
    fn backend(&mut self) -> &mut dyn Backend;
    #[allow(missing_docs)]
    fn config(&mut self) -> &mut dyn Config;

    /// Sends a named session command.
    fn send(&mut self, command: SessionCommand) -> Result<()>;

    /// Runs a backend command and returns its raw textual output.
    fn custom_command(&mut self, cmd: &str) -> Result<String>;
}

/// Creates sessions.
pub trait SessionFactory {
    /// The session type this factory produces.
    type Session: DebugSession;

    /// Creates exactly one new session for `spec`.
    fn create(&mut self, spec: &SessionSpec) -> Result<Self::Session>;
}
