//! nvgdb's session event router
//!
//! This crate is the host-side coordinator of an editor-embedded debugger
//! front-end. The editor reports lifecycle events (tabs and buffers entered or
//! left, user commands) and the router turns each of them into an ordered set
//! of calls against the debugger session, which is owned by the editor side.
//!
//! # Overview
//!
//! - [`SessionEventRouter`]: the event-to-session translation logic
//! - [`session`]: typed capability traits implemented by the external session
//! - [`editor`]: the editor-facing operations the router needs
//! - [`list`]: backtrace/breakpoint location list helpers
//! - [`host`]: a process host that serves the router over a framed JSON
//!   protocol and implements the session as reverse requests to the editor
//!
//! # Example
//!
//! ```rust,ignore
//! use nvgdb_router::{SessionEventRouter, session::SessionSpec};
//!
//! let spec = SessionSpec::new("gdb", "gdb_proxy.py", "gdb -q a.out");
//! let mut router = SessionEventRouter::new(&mut factory, editor, &spec)?;
//!
//! router.on_tab_enter()?;
//! router.lopen("backtrace", "botright")?;
//! ```

pub mod editor;
pub mod error;
pub mod host;
pub mod list;
pub mod router;
pub mod session;

pub use error::{Error, Result};
pub use list::ListKind;
pub use router::SessionEventRouter;
