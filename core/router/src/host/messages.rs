//! Host protocol message types
//!
//! Arguments of the requests the editor sends, bodies of the responses the
//! host returns, and the reverse calls the host makes into the editor.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::session::{SessionCommand, SessionSpec};

// ============================================================================
// Requests
// ============================================================================

/// A request the editor sends to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum HostCommand {
    Start,
    BreakpointClearAll,
    TabEnter,
    TabLeave,
    BufEnter,
    BufLeave,
    Lopen,
    GetForLlist,
    Shutdown,
}

impl HostCommand {
    /// Looks up a command by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "start" => Self::Start,
            "breakpointClearAll" => Self::BreakpointClearAll,
            "tabEnter" => Self::TabEnter,
            "tabLeave" => Self::TabLeave,
            "bufEnter" => Self::BufEnter,
            "bufLeave" => Self::BufLeave,
            "lopen" => Self::Lopen,
            "getForLlist" => Self::GetForLlist,
            "shutdown" => Self::Shutdown,
            _ => return None,
        })
    }
}

// ============================================================================
// Request Arguments
// ============================================================================

/// Arguments of the `start` request.
pub type StartArguments = SessionSpec;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct LopenArguments {
    pub kind: String,
    #[serde(default)]
    pub mods: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct GetForLlistArguments {
    pub kind: String,
    pub command: String,
}

// ============================================================================
// Response Bodies
// ============================================================================

/// Body of the `getForLlist` response.
///
/// `lines` is `null` when the list kind was not handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetForLlistResponseBody {
    #[allow(missing_docs)]
    pub lines: Option<Vec<String>>,
}

// ============================================================================
// Reverse Calls
// ============================================================================

/// A call the host makes into the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum SessionCall<'a> {
    NewSession(&'a SessionSpec),
    IsRunning,
    IsPaused,
    Interrupt,
    Send(SessionCommand),
    CursorShow,
    CursorHide,
    ClearSigns,
    QueryBreakpoints,
    IsJumpWindowActive,
    Lopen {
        cmd: &'a str,
        kind: &'a str,
        mods: &'a str,
    },
    DispatchSet,
    DispatchUnset,
    ConfigGet(&'a str),
    TranslateCommand(&'a str),
    CustomCommand(&'a str),
    BufferKind,
    ScrollOff,
    SetScrollOff(u32),
    CursorToEnd,
}

impl SessionCall<'_> {
    /// Wire name of the call.
    pub fn command(&self) -> &'static str {
        match self {
            Self::NewSession(_) => "session.new",
            Self::IsRunning => "parser.isRunning",
            Self::IsPaused => "parser.isPaused",
            Self::Interrupt => "client.interrupt",
            Self::Send(_) => "session.send",
            Self::CursorShow => "cursor.show",
            Self::CursorHide => "cursor.hide",
            Self::ClearSigns => "breakpoint.clearSigns",
            Self::QueryBreakpoints => "win.queryBreakpoints",
            Self::IsJumpWindowActive => "win.isJumpWindowActive",
            Self::Lopen { .. } => "win.lopen",
            Self::DispatchSet => "keymaps.dispatchSet",
            Self::DispatchUnset => "keymaps.dispatchUnset",
            Self::ConfigGet(_) => "config.get",
            Self::TranslateCommand(_) => "backend.translateCommand",
            Self::CustomCommand(_) => "session.customCommand",
            Self::BufferKind => "editor.bufferKind",
            Self::ScrollOff => "editor.scrollOff",
            Self::SetScrollOff(_) => "editor.setScrollOff",
            Self::CursorToEnd => "editor.cursorToEnd",
        }
    }

    /// Arguments of the call, if it takes any.
    pub fn arguments(&self) -> Option<Value> {
        match *self {
            Self::NewSession(spec) => Some(json!(spec)),
            Self::Send(command) => Some(json!({ "name": command.name() })),
            Self::Lopen { cmd, kind, mods } => Some(json!({
                "cmd": cmd,
                "kind": kind,
                "mods": mods,
            })),
            Self::ConfigGet(name) => Some(json!({ "name": name })),
            Self::TranslateCommand(raw) => Some(json!({ "command": raw })),
            Self::CustomCommand(cmd) => Some(json!({ "command": cmd })),
            Self::SetScrollOff(lines) => Some(json!({ "lines": lines })),
            Self::IsRunning
            | Self::IsPaused
            | Self::Interrupt
            | Self::CursorShow
            | Self::CursorHide
            | Self::ClearSigns
            | Self::QueryBreakpoints
            | Self::IsJumpWindowActive
            | Self::DispatchSet
            | Self::DispatchUnset
            | Self::BufferKind
            | Self::ScrollOff
            | Self::CursorToEnd => None,
        }
    }
}
