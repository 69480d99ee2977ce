//! Translation of editor lifecycle events into session calls.
//!
//! Every handler runs to completion on the caller's thread. The router does
//! not serialize anything on the session's behalf; its only discipline is the
//! order of the calls it issues within one handler.

use log::{debug, warn};

use crate::{
    Result,
    editor::Editor,
    list::{ListKind, split_lines},
    session::{DebugSession, SessionCommand, SessionFactory, SessionSpec},
};


/// Configuration option holding the scroll margin to apply to the jump window.
pub const SCROLL_OFF_OPTION: &str = "set_scroll_off";

/// Routes editor events to a debugger session.
///
/// The router owns its session and editor handles; it keeps no debugger
/// state besides the last list command it dispatched.
#[derive(Debug)]
pub struct SessionEventRouter<S, E> {
    session: S,
    editor: E,
    last_command: Option<String>,
}

impl<S, E> SessionEventRouter<S, E>
where
    S: DebugSession,
    E: Editor,
{
    /// Creates the session described by `spec` and a router driving it.
    ///
    /// Session creation is the first thing that happens; if it fails no
    /// router is returned.
    pub fn new<F>(factory: &mut F, editor: E, spec: &SessionSpec) -> Result<Self>
    where
        F: SessionFactory<Session = S>,
    {
        let session = factory.create(spec)?;
        debug!("created {} session", spec.backend);

        Ok(Self {
            session,
            editor,
            last_command: None,
        })
    }

    /// The last list command dispatched by [`Self::lopen`] or
    /// [`Self::get_for_llist`].
    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    /// Deletes all breakpoints, interrupting the debuggee first if it runs.
    ///
    /// The signs are not touched here; the breakpoint store redraws them once
    /// the debugger reports the change.
    pub fn clear_all_breakpoints(&mut self) -> Result<()> {
        if self.session.parser().is_running()? {
            self.session.client().interrupt()?;
        }
        self.session.send(SessionCommand::DeleteBreakpoints)
    }

    /// Restores the signs of a tab page that is entered again.
    pub fn on_tab_enter(&mut self) -> Result<()> {
        // The editor may have dropped the signs while the tab was hidden.
        if self.session.parser().is_paused()? {
            self.session.cursor().show()?;
        }
        // Breakpoints can be listed asynchronously, query them every time.
        self.session.win().query_breakpoints()
    }

    /// Hides the signs of a tab page that is left.
    pub fn on_tab_leave(&mut self) -> Result<()> {
        self.session.cursor().hide()?;
        self.session.breakpoint().clear_signs()
    }

    /// Sets up the jump window when one of its buffers is entered.
    pub fn on_buf_enter(&mut self) -> Result<()> {
        if self.editor.current_buffer_kind()?.is_terminal() {
            return Ok(());
        }
        if !self.session.win().is_jump_window_active()? {
            return Ok(());
        }

        // Keep the current line visible, unless the window sets its own margin.
        if let Some(value) = self.session.config().get(SCROLL_OFF_OPTION)? {
            match value.as_line_count() {
                Some(lines) => {
                    if self.editor.window_scroll_off()? == 0 {
                        self.editor.set_window_scroll_off(lines)?;
                    }
                }
                None => warn!("Ignoring non-numeric {SCROLL_OFF_OPTION} {value:?}"),
            }
        }

        self.session.keymaps().dispatch_set()?;
        self.session.win().query_breakpoints()
    }

    /// Tears down the jump window keymaps, or parks a terminal at its end.
    pub fn on_buf_leave(&mut self) -> Result<()> {
        if self.editor.current_buffer_kind()?.is_terminal() {
            return self.editor.move_cursor_to_end();
        }
        if self.session.win().is_jump_window_active()? {
            self.session.keymaps().dispatch_unset()?;
        }
        Ok(())
    }

    /// Loads the backtrace or the breakpoints into the location list.
    ///
    /// Unknown kinds are logged and ignored.
    pub fn lopen(&mut self, kind: &str, mods: &str) -> Result<()> {
        let Ok(list) = kind.parse::<ListKind>() else {
            warn!("Unknown lopen kind {kind}");
            return Ok(());
        };

        let cmd = self
            .session
            .backend()
            .translate_command(list.raw_command())?;
        self.session.win().lopen(&cmd, list.tag(), mods)?;
        self.last_command = Some(cmd);
        Ok(())
    }

    /// Runs `cmd` and returns its output lines for the location list.
    ///
    /// Returns `None` when `kind` is not a list this router knows, in which
    /// case nothing is executed. `Some` with no useful lines is a handled,
    /// empty result.
    pub fn get_for_llist(&mut self, kind: &str, cmd: &str) -> Result<Option<Vec<String>>> {
        let list = match kind.parse::<ListKind>() {
            Ok(list) => list,
            Err(err) => {
                warn!("Unknown lopen kind {}", err.0);
                return Ok(None);
            }
        };

        let output = self.session.custom_command(cmd)?;
        self.last_command = Some(cmd.to_string());

        // Both lists are plain lines for now.
        let lines = match list {
            ListKind::Backtrace | ListKind::Breakpoints => split_lines(&output),
        };
        Ok(Some(lines))
    }
}
