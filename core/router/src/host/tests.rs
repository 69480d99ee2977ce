use std::{
    cell::RefCell,
    io::{self, Cursor, Write},
    rc::Rc,
};

use serde_json::{Value, json};

use super::*;
use crate::Error;

#[derive(Debug, Clone, Default)]
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn request(seq: i64, command: &str, arguments: Option<Value>) -> Value {
    let mut message = json!({ "type": "request", "seq": seq, "command": command });
    if let Some(arguments) = arguments {
        message["arguments"] = arguments;
    }
    message
}

fn reply(request_seq: i64, command: &str, body: Value) -> Value {
    json!({
        "type": "response",
        "seq": 100 + request_seq,
        "request_seq": request_seq,
        "success": true,
        "command": command,
        "body": body,
    })
}

fn start() -> Value {
    request(
        1,
        "start",
        Some(json!({ "backend": "gdb", "proxyCmd": "gdb_proxy", "clientCmd": "gdb -q a.out" })),
    )
}

fn frame(messages: &[Value]) -> Vec<u8> {
    let mut transport = StreamTransport::new(io::empty(), Vec::new());
    for message in messages {
        transport.write_message(&message.to_string()).unwrap();
    }
    transport.into_inner().1
}

fn unframe(bytes: Vec<u8>) -> Vec<Value> {
    let mut transport = StreamTransport::new(Cursor::new(bytes), io::sink());
    let mut messages = Vec::new();
    while let Some(json) = transport.read_message().unwrap() {
        messages.push(serde_json::from_str(&json).unwrap());
    }
    messages
}

/// Runs a server over the scripted editor input, returning the run result
/// and everything the host wrote.
fn serve(input: &[Value]) -> (Result<(), Error>, Vec<Value>) {
    serve_bytes(frame(input))
}

fn serve_bytes(input: Vec<u8>) -> (Result<(), Error>, Vec<Value>) {
    let output = SharedBuffer::default();
    let transport = StreamTransport::new(Cursor::new(input), output.clone());

    let mut server = HostServer::new(transport);
    let result = server.run();

    let written = output.0.borrow().clone();
    (result, unframe(written))
}

fn commands(messages: &[Value]) -> Vec<(String, i64)> {
    messages
        .iter()
        .map(|m| {
            (
                format!(
                    "{}:{}",
                    m["type"].as_str().unwrap(),
                    m["command"].as_str().unwrap()
                ),
                m["seq"].as_i64().unwrap(),
            )
        })
        .collect()
}

fn owned(expected: &[(&str, i64)]) -> Vec<(String, i64)> {
    expected
        .iter()
        .map(|(name, seq)| ((*name).to_string(), *seq))
        .collect()
}

#[test]
fn lifecycle_requests_need_a_session() {
    let (result, output) = serve(&[request(1, "tabEnter", None)]);

    assert!(result.is_ok());
    assert_eq!(output.len(), 1);
    assert_eq!(output[0]["request_seq"], 1);
    assert_eq!(output[0]["success"], false);
    assert_eq!(output[0]["message"], "no active session");
}

#[test]
fn unknown_command_fails() {
    let (_, output) = serve(&[request(7, "frobnicate", None)]);

    assert_eq!(output[0]["command"], "frobnicate");
    assert_eq!(output[0]["success"], false);
    assert_eq!(output[0]["message"], "Unknown command: frobnicate");
}

#[test]
fn start_then_tab_enter_while_paused() {
    let (result, output) = serve(&[
        start(),
        reply(1, "session.new", Value::Null),
        request(2, "tabEnter", None),
        reply(3, "parser.isPaused", json!(true)),
        reply(4, "cursor.show", Value::Null),
        reply(5, "win.queryBreakpoints", Value::Null),
    ]);

    assert!(result.is_ok());
    assert_eq!(
        commands(&output),
        owned(&[
            ("request:session.new", 1),
            ("response:start", 2),
            ("request:parser.isPaused", 3),
            ("request:cursor.show", 4),
            ("request:win.queryBreakpoints", 5),
            ("response:tabEnter", 6),
        ])
    );
    assert_eq!(
        output[0]["arguments"],
        json!({ "backend": "gdb", "proxyCmd": "gdb_proxy", "clientCmd": "gdb -q a.out" })
    );
    assert_eq!(output[5]["success"], true);
}

#[test]
fn clear_all_breakpoints_interrupts_then_deletes() {
    let (_, output) = serve(&[
        start(),
        reply(1, "session.new", Value::Null),
        request(2, "breakpointClearAll", None),
        reply(3, "parser.isRunning", json!(true)),
        reply(4, "client.interrupt", Value::Null),
        reply(5, "session.send", Value::Null),
    ]);

    assert_eq!(
        commands(&output)[2..],
        owned(&[
            ("request:parser.isRunning", 3),
            ("request:client.interrupt", 4),
            ("request:session.send", 5),
            ("response:breakpointClearAll", 6),
        ])
    );
    assert_eq!(output[4]["arguments"], json!({ "name": "delete_breakpoints" }));
}

#[test]
fn buf_enter_applies_scroll_off() {
    let (_, output) = serve(&[
        start(),
        reply(1, "session.new", Value::Null),
        request(2, "bufEnter", None),
        reply(3, "editor.bufferKind", json!("normal")),
        reply(4, "win.isJumpWindowActive", json!(true)),
        reply(5, "config.get", json!(5)),
        reply(6, "editor.scrollOff", json!(0)),
        reply(7, "editor.setScrollOff", Value::Null),
        reply(8, "keymaps.dispatchSet", Value::Null),
        reply(9, "win.queryBreakpoints", Value::Null),
    ]);

    assert_eq!(
        commands(&output)[2..],
        owned(&[
            ("request:editor.bufferKind", 3),
            ("request:win.isJumpWindowActive", 4),
            ("request:config.get", 5),
            ("request:editor.scrollOff", 6),
            ("request:editor.setScrollOff", 7),
            ("request:keymaps.dispatchSet", 8),
            ("request:win.queryBreakpoints", 9),
            ("response:bufEnter", 10),
        ])
    );
    assert_eq!(output[4]["arguments"], json!({ "name": "set_scroll_off" }));
    assert_eq!(output[6]["arguments"], json!({ "lines": 5 }));
}

#[test]
fn lopen_translates_and_opens() {
    let (_, output) = serve(&[
        start(),
        reply(1, "session.new", Value::Null),
        request(2, "lopen", Some(json!({ "kind": "breakpoints", "mods": "vertical" }))),
        reply(3, "backend.translateCommand", json!("breakpoint list")),
        reply(4, "win.lopen", Value::Null),
    ]);

    assert_eq!(output[2]["arguments"], json!({ "command": "info breakpoints" }));
    assert_eq!(
        output[3]["arguments"],
        json!({ "cmd": "breakpoint list", "kind": "breakpoints", "mods": "vertical" })
    );
    assert_eq!(output[4]["command"], "lopen");
    assert_eq!(output[4]["success"], true);
}

#[test]
fn get_for_llist_returns_lines() {
    let (_, output) = serve(&[
        start(),
        reply(1, "session.new", Value::Null),
        request(2, "getForLlist", Some(json!({ "kind": "backtrace", "command": "bt" }))),
        reply(3, "session.customCommand", json!("#0 main\r\n#1 start\n")),
    ]);

    assert_eq!(output[2]["command"], "session.customCommand");
    assert_eq!(output[2]["arguments"], json!({ "command": "bt" }));
    assert_eq!(output[3]["body"], json!({ "lines": ["#0 main", "#1 start", ""] }));
}

#[test]
fn get_for_llist_unknown_kind_is_not_handled() {
    let (_, output) = serve(&[
        start(),
        reply(1, "session.new", Value::Null),
        request(2, "getForLlist", Some(json!({ "kind": "stack", "command": "bt" }))),
    ]);

    assert_eq!(commands(&output)[2..], owned(&[("response:getForLlist", 3)]));
    assert_eq!(output[2]["body"], json!({ "lines": null }));
}

#[test]
fn invalid_arguments_are_reported() {
    let (_, output) = serve(&[
        start(),
        reply(1, "session.new", Value::Null),
        request(2, "lopen", Some(json!({ "mods": "vertical" }))),
    ]);

    assert_eq!(output[2]["success"], false);
    assert!(
        output[2]["message"]
            .as_str()
            .unwrap()
            .starts_with("invalid arguments for `lopen`")
    );
}

#[test]
fn failed_start_leaves_no_session() {
    let (_, output) = serve(&[
        start(),
        json!({
            "type": "response",
            "seq": 50,
            "request_seq": 1,
            "success": false,
            "command": "session.new",
            "message": "no such backend",
        }),
        request(2, "tabLeave", None),
    ]);

    assert_eq!(output[1]["success"], false);
    assert_eq!(output[1]["message"], "`session.new` failed: no such backend");
    assert_eq!(output[2]["message"], "no active session");
}

#[test]
fn second_start_is_rejected() {
    let (_, output) = serve(&[start(), reply(1, "session.new", Value::Null), start()]);

    assert_eq!(output.len(), 3);
    assert_eq!(output[2]["message"], "session already started");
}

#[test]
fn shutdown_stops_serving() {
    let (result, output) = serve(&[request(1, "shutdown", None), request(2, "tabEnter", None)]);

    assert!(result.is_ok());
    assert_eq!(commands(&output), owned(&[("response:shutdown", 1)]));
}

#[test]
fn disconnect_while_awaiting_reply_is_an_error() {
    let (result, output) = serve(&[start()]);

    assert!(matches!(result, Err(Error::Disconnected)));
    assert_eq!(commands(&output), owned(&[("request:session.new", 1)]));
}

#[test]
fn request_while_awaiting_reply_is_answered_and_fails_the_call() {
    let (result, output) = serve(&[start(), request(2, "tabEnter", None)]);

    assert!(result.is_ok());
    assert_eq!(
        commands(&output),
        owned(&[
            ("request:session.new", 1),
            ("response:tabEnter", 2),
            ("response:start", 3),
        ])
    );
    assert_eq!(output[1]["request_seq"], 2);
    assert_eq!(output[1]["success"], false);
    assert_eq!(output[1]["message"], "host busy with `session.new`");

    assert_eq!(output[2]["request_seq"], 1);
    assert_eq!(output[2]["success"], false);
    assert!(
        output[2]["message"]
            .as_str()
            .unwrap()
            .starts_with("protocol error")
    );
}

#[test]
fn malformed_frames_are_skipped() {
    let mut transport = StreamTransport::new(io::empty(), Vec::new());
    transport.write_message("{not json").unwrap();
    transport.write_message(r#"{"type":"notice","seq":1}"#).unwrap();
    let mut input = transport.into_inner().1;
    input.extend(frame(&[request(2, "tabEnter", None)]));

    let (result, output) = serve_bytes(input);

    assert!(result.is_ok());
    assert_eq!(commands(&output), owned(&[("response:tabEnter", 1)]));
    assert_eq!(output[0]["request_seq"], 2);
    assert_eq!(output[0]["message"], "no active session");
}

#[test]
fn buf_enter_skips_unexpected_scroll_off_shape() {
    let (_, output) = serve(&[
        start(),
        reply(1, "session.new", Value::Null),
        request(2, "bufEnter", None),
        reply(3, "editor.bufferKind", json!("normal")),
        reply(4, "win.isJumpWindowActive", json!(true)),
        reply(5, "config.get", json!(2.5)),
        reply(6, "keymaps.dispatchSet", Value::Null),
        reply(7, "win.queryBreakpoints", Value::Null),
    ]);

    assert_eq!(
        commands(&output)[5..],
        owned(&[
            ("request:keymaps.dispatchSet", 6),
            ("request:win.queryBreakpoints", 7),
            ("response:bufEnter", 8),
        ])
    );
    assert_eq!(output[7]["success"], true);
}
