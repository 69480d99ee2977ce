//! Host server implementation
//!
//! Reads editor requests from the channel, dispatches them to the
//! [`SessionEventRouter`] and answers each one with a response.

use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;

use super::{
    ProtocolMessage, Request, Response, Transport,
    messages::{
        GetForLlistArguments, GetForLlistResponseBody, HostCommand, LopenArguments,
        StartArguments,
    },
    remote::{Channel, RemoteEditor, RemoteSession, RemoteSessionFactory, SharedChannel},
};
use crate::{Error, Result, SessionEventRouter};

type RemoteRouter<T> = SessionEventRouter<RemoteSession<T>, RemoteEditor<T>>;

/// Host server that handles protocol communication
#[derive(Debug)]
pub struct HostServer<T> {
    channel: SharedChannel<T>,

    /// The router, once the editor started a session
    router: Option<RemoteRouter<T>>,
}

impl<T: Transport> HostServer<T> {
    /// Creates a new host server over `transport`
    pub fn new(transport: T) -> Self {
        Self {
            channel: Channel::new(transport).shared(),
            router: None,
        }
    }

    /// Serves requests until the editor disconnects or asks for shutdown.
    ///
    /// Handler failures are reported to the editor and serving goes on, as
    /// do frames that are not a valid message. Transport failures end the
    /// loop with an error.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let message = match self.channel.borrow_mut().receive() {
                Ok(message) => message,
                Err(Error::Json(err)) => {
                    error!("Dropping malformed message: {err}");
                    continue;
                }
                Err(err) => return Err(err),
            };

            match message {
                Some(ProtocolMessage::Request(request)) => {
                    let stop =
                        HostCommand::from_name(&request.command) == Some(HostCommand::Shutdown);
                    let response = self.handle_request(request)?;
                    self.channel.borrow_mut().send(&response)?;
                    if stop {
                        info!("Shutdown requested");
                        return Ok(());
                    }
                }
                Some(other) => {
                    warn!("Unexpected message #{} (not a request)", other.seq());
                }
                None => {
                    info!("Editor disconnected");
                    return Ok(());
                }
            }
        }
    }

    /// Handles a request and returns its response.
    ///
    /// Only transport failures are returned as errors.
    fn handle_request(&mut self, request: Request) -> Result<ProtocolMessage> {
        let command = request.command.clone();
        let request_seq = request.seq;
        debug!("Request {command} #{request_seq}");

        let Some(host_command) = HostCommand::from_name(&command) else {
            return Ok(self.create_response(
                request_seq,
                &command,
                false,
                Some(format!("Unknown command: {command}")),
                None,
            ));
        };

        let result = match host_command {
            HostCommand::Start => self.handle_start(&request),
            HostCommand::BreakpointClearAll => self
                .router()
                .and_then(SessionEventRouter::clear_all_breakpoints)
                .map(|()| None),
            HostCommand::TabEnter => self
                .router()
                .and_then(SessionEventRouter::on_tab_enter)
                .map(|()| None),
            HostCommand::TabLeave => self
                .router()
                .and_then(SessionEventRouter::on_tab_leave)
                .map(|()| None),
            HostCommand::BufEnter => self
                .router()
                .and_then(SessionEventRouter::on_buf_enter)
                .map(|()| None),
            HostCommand::BufLeave => self
                .router()
                .and_then(SessionEventRouter::on_buf_leave)
                .map(|()| None),
            HostCommand::Lopen => self.handle_lopen(&request),
            HostCommand::GetForLlist => self.handle_get_for_llist(&request),
            HostCommand::Shutdown => Ok(None),
        };

        match result {
            Ok(body) => Ok(self.create_response(request_seq, &command, true, None, body)),
            Err(err @ (Error::Io(_) | Error::Disconnected)) => Err(err),
            Err(err) => {
                error!("{command} failed: {err}");
                Ok(self.create_response(request_seq, &command, false, Some(err.to_string()), None))
            }
        }
    }

    fn router(&mut self) -> Result<&mut RemoteRouter<T>> {
        self.router.as_mut().ok_or(Error::NoSession)
    }

    fn handle_start(&mut self, request: &Request) -> Result<Option<serde_json::Value>> {
        if self.router.is_some() {
            return Err(Error::AlreadyStarted);
        }
        let spec: StartArguments = arguments(request)?;

        let mut factory = RemoteSessionFactory::new(self.channel.clone());
        let editor = RemoteEditor::new(self.channel.clone());
        self.router = Some(SessionEventRouter::new(&mut factory, editor, &spec)?);

        info!("Started {} session", spec.backend);
        Ok(None)
    }

    fn handle_lopen(&mut self, request: &Request) -> Result<Option<serde_json::Value>> {
        let router = self.router()?;
        let args: LopenArguments = arguments(request)?;
        router.lopen(&args.kind, &args.mods)?;
        Ok(None)
    }

    fn handle_get_for_llist(&mut self, request: &Request) -> Result<Option<serde_json::Value>> {
        let router = self.router()?;
        let args: GetForLlistArguments = arguments(request)?;
        let lines = router.get_for_llist(&args.kind, &args.command)?;

        let body = serde_json::to_value(GetForLlistResponseBody { lines })?;
        Ok(Some(body))
    }

    /// Creates a response message
    fn create_response(
        &self,
        request_seq: i64,
        command: &str,
        success: bool,
        message: Option<String>,
        body: Option<serde_json::Value>,
    ) -> ProtocolMessage {
        ProtocolMessage::Response(Response {
            seq: self.channel.borrow_mut().next_seq(),
            request_seq,
            success,
            command: command.to_string(),
            message,
            body,
        })
    }
}

fn arguments<A: DeserializeOwned>(request: &Request) -> Result<A> {
    serde_json::from_value(request.arguments.clone().unwrap_or_default()).map_err(|source| {
        Error::InvalidArguments {
            command: request.command.clone(),
            source,
        }
    })
}
