//! Transport layer for host communication
//!
//! Messages are framed as `Content-Length: N\r\n\r\n` followed by `N` bytes
//! of JSON.

use std::io::{self, BufRead, BufReader, Write};

/// Largest message body accepted from the peer, in bytes.
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// A trait for transporting framed messages
pub trait Transport {
    /// Reads the next message, or `None` once the peer closed the stream.
    fn read_message(&mut self) -> io::Result<Option<String>>;

    /// Writes a message to the transport
    fn write_message(&mut self, message: &str) -> io::Result<()>;
}

/// Framed transport over a pair of byte streams.
#[derive(Debug)]
pub struct StreamTransport<R, W> {
    reader: R,
    writer: W,
}

/// Standard I/O transport (stdin/stdout)
pub type StdioTransport = StreamTransport<BufReader<io::Stdin>, io::Stdout>;

impl<R, W> StreamTransport<R, W> {
    /// Creates a transport reading from `reader` and writing to `writer`.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consumes the transport, returning the underlying streams.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl StdioTransport {
    /// Creates a transport over the process' stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> Transport for StreamTransport<R, W> {
    fn read_message(&mut self) -> io::Result<Option<String>> {
        let mut content_length = None;
        let mut started = false;

        // Headers end with an empty line.
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                if started {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "stream closed inside message header",
                    ));
                }
                return Ok(None);
            }

            let line = line.trim();
            if line.is_empty() {
                if started {
                    break;
                }
                continue;
            }
            started = true;

            if let Some(value) = line.strip_prefix("Content-Length:") {
                let length = value.trim().parse::<usize>().map_err(|e| {
                    io::Error::new(io::ErrorKind::InvalidData, format!("Invalid Content-Length: {e}"))
                })?;
                content_length = Some(length);
            }
        }

        let Some(content_length) = content_length else {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "Missing Content-Length"));
        };
        if content_length > MAX_MESSAGE_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Content-Length {content_length} exceeds {MAX_MESSAGE_SIZE}"),
            ));
        }

        let mut body = vec![0u8; content_length];
        self.reader.read_exact(&mut body)?;

        String::from_utf8(body)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write_message(&mut self, message: &str) -> io::Result<()> {
        write!(
            self.writer,
            "Content-Length: {}\r\n\r\n{}",
            message.len(),
            message
        )?;
        self.writer.flush()
    }
}
