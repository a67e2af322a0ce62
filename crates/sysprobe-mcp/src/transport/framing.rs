//! Envelope framing over a continuous byte stream.
//!
//! Messages may be separated by newlines or any other whitespace, or simply
//! concatenated. Each call consumes exactly one complete JSON document.

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::types::{Envelope, McpError, McpResult};

const READ_CHUNK: usize = 8 * 1024;

/// Incremental decoder that yields one [`Envelope`] per call.
///
/// Buffered bytes are scanned once for the end of the next top-level value;
/// `serde_json` only runs on a value that is already closed.
pub struct EnvelopeDecoder<R> {
    reader: R,
    buf: Vec<u8>,
    scanner: BoundaryScanner,
    eof: bool,
}

impl<R: AsyncRead + Unpin> EnvelopeDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(READ_CHUNK),
            scanner: BoundaryScanner::default(),
            eof: false,
        }
    }

    /// Decode the next envelope.
    ///
    /// `Ok(None)` means the stream ended cleanly with nothing but whitespace
    /// left over. Malformed JSON, a document cut off by end-of-stream, and
    /// read failures are transport errors.
    pub async fn next_envelope(&mut self) -> McpResult<Option<Envelope>> {
        loop {
            if let Some(envelope) = self.try_decode()? {
                return Ok(Some(envelope));
            }

            if self.eof {
                if self.buf.iter().all(u8::is_ascii_whitespace) {
                    self.buf.clear();
                    self.scanner = BoundaryScanner::default();
                    return Ok(None);
                }
                return Err(McpError::Transport(
                    "decode request: unexpected end of stream inside a message".to_string(),
                ));
            }

            let mut chunk = [0u8; READ_CHUNK];
            let read = self.reader.read(&mut chunk).await?;
            if read == 0 {
                self.eof = true;
            } else {
                self.buf.extend_from_slice(&chunk[..read]);
            }
        }
    }

    fn try_decode(&mut self) -> McpResult<Option<Envelope>> {
        let Some(end) = self.scanner.scan(&self.buf) else {
            return Ok(None);
        };

        let (envelope, consumed) = {
            let mut stream =
                serde_json::Deserializer::from_slice(&self.buf[..end]).into_iter::<Envelope>();
            match stream.next() {
                None => return Ok(None),
                Some(Ok(envelope)) => (envelope, stream.byte_offset()),
                Some(Err(e)) if e.is_eof() => return Ok(None),
                Some(Err(e)) => return Err(McpError::Transport(format!("decode request: {e}"))),
            }
        };
        self.buf.drain(..consumed);
        self.scanner = BoundaryScanner::default();
        Ok(Some(envelope))
    }
}

/// Tracks nesting across reads to find where the first top-level value ends.
#[derive(Debug, Default)]
struct BoundaryScanner {
    /// Bytes of the buffer already scanned.
    offset: usize,
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl BoundaryScanner {
    /// Scan bytes not seen yet. Returns the length of the buffer prefix that
    /// holds a closed top-level value, or the whole buffer when the input
    /// does not start with an object or array so the parser can reject it.
    fn scan(&mut self, buf: &[u8]) -> Option<usize> {
        while self.offset < buf.len() {
            let byte = buf[self.offset];

            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if byte == b'\\' {
                    self.escaped = true;
                } else if byte == b'"' {
                    self.in_string = false;
                }
                self.offset += 1;
                continue;
            }

            match byte {
                b'{' | b'[' => self.depth += 1,
                b'}' | b']' if self.depth > 0 => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        self.offset += 1;
                        return Some(self.offset);
                    }
                }
                b'"' if self.depth > 0 => self.in_string = true,
                byte if self.depth == 0 && !byte.is_ascii_whitespace() => {
                    // Not the start of an object; stay here and let serde report it.
                    return Some(buf.len());
                }
                _ => {}
            }
            self.offset += 1;
        }
        None
    }
}

/// Serialize a value as one JSON document followed by a newline.
///
/// No escaping beyond what JSON requires: non-ASCII and markup characters are
/// written as-is.
pub fn frame_message<T: Serialize>(value: &T) -> McpResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec(value).map_err(McpError::Json)?;
    bytes.push(b'\n');
    Ok(bytes)
}
