//! Session and editor implemented as reverse requests to the editor.
//!
//! The editor blocks while it waits for the response to its own request, so
//! the only messages expected while a reverse call is pending are responses.
//! A request arriving anyway is answered as failed and aborts the call.

use std::{cell::RefCell, rc::Rc};

use log::{debug, warn};
use serde::de::DeserializeOwned;

use super::{
    ProtocolMessage, Request, Response, Transport,
    messages::SessionCall,
};
use crate::{
    Error, Result,
    editor::{BufferKind, Editor},
    session::{
        Backend, Breakpoints, Client, Config, ConfigValue, Cursor, DebugSession, Keymaps, Parser,
        SessionCommand, SessionFactory, SessionSpec, Win,
    },
};

/// The message channel to the editor.
///
/// Owns the transport and the sequence counter shared by responses and
/// reverse requests.
#[derive(Debug)]
pub struct Channel<T> {
    transport: T,
    seq: i64,
}

/// A [`Channel`] shared between the server and the remote session.
pub type SharedChannel<T> = Rc<RefCell<Channel<T>>>;

impl<T: Transport> Channel<T> {
    /// Creates a new channel over `transport`.
    pub fn new(transport: T) -> Self {
        Self { transport, seq: 1 }
    }

    /// Wraps the channel for sharing.
    pub fn shared(self) -> SharedChannel<T> {
        Rc::new(RefCell::new(self))
    }

    /// Gets the next sequence number
    pub fn next_seq(&mut self) -> i64 {
        let seq = self.seq;
        self.seq += 1;
        seq
    }

    /// Sends a protocol message
    pub fn send(&mut self, message: &ProtocolMessage) -> Result<()> {
        let json = serde_json::to_string(message)?;
        self.transport.write_message(&json)?;
        Ok(())
    }

    /// Receives the next protocol message, `None` at end of input.
    pub fn receive(&mut self) -> Result<Option<ProtocolMessage>> {
        match self.transport.read_message()? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Issues a reverse request and waits for its response body.
    pub fn call(&mut self, call: &SessionCall<'_>) -> Result<Option<serde_json::Value>> {
        let seq = self.next_seq();
        let command = call.command();
        debug!("-> {command} #{seq}");

        self.send(&ProtocolMessage::Request(Request {
            seq,
            command: command.to_string(),
            arguments: call.arguments(),
        }))?;

        loop {
            match self.receive()? {
                Some(ProtocolMessage::Response(Response {
                    request_seq,
                    success,
                    message,
                    body,
                    ..
                })) if request_seq == seq => {
                    debug!("<- {command} #{seq} success={success}");
                    if !success {
                        return Err(Error::Remote {
                            command: command.to_string(),
                            message: message.unwrap_or_default(),
                        });
                    }
                    return Ok(body);
                }
                Some(ProtocolMessage::Response(response)) => {
                    warn!(
                        "Dropping response to #{} while awaiting {command} #{seq}",
                        response.request_seq
                    );
                }
                Some(ProtocolMessage::Request(request)) => {
                    warn!(
                        "Rejecting {} #{} while awaiting {command}",
                        request.command, request.seq
                    );
                    let busy = ProtocolMessage::Response(Response {
                        seq: self.next_seq(),
                        request_seq: request.seq,
                        success: false,
                        command: request.command.clone(),
                        message: Some(format!("host busy with `{command}`")),
                        body: None,
                    });
                    self.send(&busy)?;
                    return Err(Error::protocol(format!(
                        "request `{}` received while awaiting `{command}`",
                        request.command
                    )));
                }
                None => return Err(Error::Disconnected),
            }
        }
    }
}

fn call<T, R>(channel: &SharedChannel<T>, call: &SessionCall<'_>) -> Result<R>
where
    T: Transport,
    R: DeserializeOwned,
{
    let body = channel.borrow_mut().call(call)?;
    Ok(serde_json::from_value(body.unwrap_or_default())?)
}

/// The editor-side debugger session, reached over the channel.
#[derive(Debug)]
pub struct RemoteSession<T> {
    channel: SharedChannel<T>,
}

impl<T: Transport> RemoteSession<T> {
    fn call<R: DeserializeOwned>(&self, session_call: &SessionCall<'_>) -> Result<R> {
        call(&self.channel, session_call)
    }
}

/// Creates [`RemoteSession`]s by asking the editor for a new session.
#[derive(Debug)]
pub struct RemoteSessionFactory<T> {
    channel: SharedChannel<T>,
}

impl<T> RemoteSessionFactory<T> {
    /// Creates a factory issuing its calls over `channel`.
    pub fn new(channel: SharedChannel<T>) -> Self {
        Self { channel }
    }
}

impl<T: Transport> SessionFactory for RemoteSessionFactory<T> {
    type Session = RemoteSession<T>;

    fn create(&mut self, spec: &SessionSpec) -> Result<RemoteSession<T>> {
        call::<T, ()>(&self.channel, &SessionCall::NewSession(spec))?;
        Ok(RemoteSession {
            channel: self.channel.clone(),
        })
    }
}

impl<T: Transport> Parser for RemoteSession<T> {
    fn is_running(&mut self) -> Result<bool> {
        self.call(&SessionCall::IsRunning)
    }

    fn is_paused(&mut self) -> Result<bool> {
        self.call(&SessionCall::IsPaused)
    }
}

impl<T: Transport> Client for RemoteSession<T> {
    fn interrupt(&mut self) -> Result<()> {
        self.call(&SessionCall::Interrupt)
    }
}

impl<T: Transport> Cursor for RemoteSession<T> {
    fn show(&mut self) -> Result<()> {
        self.call(&SessionCall::CursorShow)
    }

    fn hide(&mut self) -> Result<()> {
        self.call(&SessionCall::CursorHide)
    }
}

impl<T: Transport> Breakpoints for RemoteSession<T> {
    fn clear_signs(&mut self) -> Result<()> {
        self.call(&SessionCall::ClearSigns)
    }
}

impl<T: Transport> Win for RemoteSession<T> {
    fn query_breakpoints(&mut self) -> Result<()> {
        self.call(&SessionCall::QueryBreakpoints)
    }

    fn is_jump_window_active(&mut self) -> Result<bool> {
        self.call(&SessionCall::IsJumpWindowActive)
    }

    fn lopen(&mut self, cmd: &str, kind: &str, mods: &str) -> Result<()> {
        self.call(&SessionCall::Lopen { cmd, kind, mods })
    }
}

impl<T: Transport> Keymaps for RemoteSession<T> {
    fn dispatch_set(&mut self) -> Result<()> {
        self.call(&SessionCall::DispatchSet)
    }

    fn dispatch_unset(&mut self) -> Result<()> {
        self.call(&SessionCall::DispatchUnset)
    }
}

impl<T: Transport> Backend for RemoteSession<T> {
    fn translate_command(&mut self, raw: &str) -> Result<String> {
        self.call(&SessionCall::TranslateCommand(raw))
    }
}

impl<T: Transport> Config for RemoteSession<T> {
    fn get(&mut self, name: &str) -> Result<Option<ConfigValue>> {
        self.call(&SessionCall::ConfigGet(name))
    }
}

impl<T: Transport> DebugSession for RemoteSession<T> {
    fn parser(&mut self) -> &mut dyn Parser {
        self
    }

    fn client(&mut self) -> &mut dyn Client {
        self
    }

    fn cursor(&mut self) -> &mut dyn Cursor {
        self
    }

    fn win(&mut self) -> &mut dyn Win {
        self
    }

    fn breakpoint(&mut self) -> &mut dyn Breakpoints {
        self
    }

    fn keymaps(&mut self) -> &mut dyn Keymaps {
        self
    }

    fn backend(&mut self) -> &mut dyn Backend {
        self
    }

    fn config(&mut self) -> &mut dyn Config {
        self
    }

    fn send(&mut self, command: SessionCommand) -> Result<()> {
        self.call(&SessionCall::Send(command))
    }

    fn custom_command(&mut self, cmd: &str) -> Result<String> {
        self.call(&SessionCall::CustomCommand(cmd))
    }
}

/// The editor, reached over the channel.
#[derive(Debug)]
pub struct RemoteEditor<T> {
    channel: SharedChannel<T>,
}

impl<T> RemoteEditor<T> {
    /// Creates an editor handle issuing its calls over `channel`.
    pub fn new(channel: SharedChannel<T>) -> Self {
        Self { channel }
    }
}

impl<T: Transport> Editor for RemoteEditor<T> {
    fn current_buffer_kind(&mut self) -> Result<BufferKind> {
        call(&self.channel, &SessionCall::BufferKind)
    }

    fn window_scroll_off(&mut self) -> Result<u32> {
        call(&self.channel, &SessionCall::ScrollOff)
    }

    fn set_window_scroll_off(&mut self, lines: u32) -> Result<()> {
        call(&self.channel, &SessionCall::SetScrollOff(lines))
    }

    fn move_cursor_to_end(&mut self) -> Result<()> {
        call(&self.channel, &SessionCall::CursorToEnd)
    }
}
