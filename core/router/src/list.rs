//! Location list helpers.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

static LINE_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n]+").expect("line separator pattern is valid"));

/// Lists that can be loaded into the editor's location list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// The call stack of the paused debuggee.
    Backtrace,
    /// The breakpoints known to the debugger.
    Breakpoints,
}

impl ListKind {
    /// The tag the editor uses for this list.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Backtrace => "backtrace",
            Self::Breakpoints => "breakpoints",
        }
    }

    /// The raw (gdb-flavoured) command producing this list, before backend
    /// translation.
    pub fn raw_command(self) -> &'static str {
        match self {
            Self::Backtrace => "bt",
            Self::Breakpoints => "info breakpoints",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Error returned when parsing an unknown list tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown list kind `{0}`")]
pub struct UnknownListKind(pub String);

impl FromStr for ListKind {
    type Err = UnknownListKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backtrace" => Ok(Self::Backtrace),
            "breakpoints" => Ok(Self::Breakpoints),
            _ => Err(UnknownListKind(s.to_string())),
        }
    }
}

/// Splits command output on runs of `\r` and `\n`.
///
/// Empty segments survive only at the ends: output finishing with a line
/// break yields a trailing `""`.
pub fn split_lines(output: &str) -> Vec<String> {
    LINE_SEPARATORS
        .split(output)
        .map(str::to_string)
        .collect()
}
