//! Line-delimited fragment decoding.
//!
//! [`fragments`] frames an arbitrary byte stream into lines and decodes each
//! non-empty line into a text fragment. Per-line problems ([`StreamError::Decode`],
//! [`StreamError::Oversized`], [`StreamError::Upstream`]) are yielded inline and
//! the stream carries on with the next line. A failure reading the body
//! ([`StreamError::Transport`]) is the last item the stream produces.
//!
//! Framing works on raw bytes. Only the JSON decode of a complete line looks
//! at its content, so invalid UTF-8 or an over-long line costs that one line.

use std::pin::Pin;

use bytes::{Buf, Bytes, BytesMut};
use futures::{Stream, StreamExt, TryStreamExt};
use tokio_util::codec::{Decoder, FramedRead};
use tokio_util::io::StreamReader;

use crate::messages::parse_chunk;

/// Longest line accepted from the server. A single chunk line is tiny; this
/// only guards against an unterminated or hostile body.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// How much of an undecodable line is kept for diagnostics.
const LINE_PREVIEW_CHARS: usize = 120;

/// Boxed stream of decoded fragments, in upstream order.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, StreamError>> + Send>>;

/// A problem with one item of a fragment stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// A line was not a valid chunk object. Non-fatal.
    #[error("failed to decode stream line {line:?}: {source}")]
    Decode {
        /// Leading part of the offending line, lossily converted to UTF-8.
        line: String,
        #[source]
        source: serde_json::Error,
    },

    /// A line exceeded [`MAX_LINE_BYTES`] and was discarded. Non-fatal.
    #[error("stream line of {len} bytes exceeds the line length limit")]
    Oversized { len: usize },

    /// The server reported an error inside the stream. Non-fatal.
    #[error("inference server reported: {0}")]
    Upstream(String),

    /// Reading the body failed. The stream ends after this item.
    #[error("stream transport failed: {0}")]
    Transport(#[from] std::io::Error),
}

impl StreamError {
    /// Whether the stream stops after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StreamError::Transport(_))
    }
}

/// One framed line of the body.
#[derive(Debug, PartialEq)]
enum RawLine {
    /// Line content without its terminator.
    Line(Bytes),
    /// A line longer than the limit; its bytes were dropped.
    Oversized(usize),
}

/// Newline framer over raw bytes.
///
/// Unlike `LinesCodec` it never fails on content: an over-long line is
/// skipped up to its terminator and reported as [`RawLine::Oversized`], and
/// the bytes of a line are handed on without UTF-8 validation. The only
/// error is an I/O error from the underlying reader.
#[derive(Debug)]
struct RawLineCodec {
    max_length: usize,
    /// Where to resume the newline search in the buffer.
    next_index: usize,
    /// Bytes dropped so far from an over-long line still being skipped.
    discarding: Option<usize>,
}

impl RawLineCodec {
    fn new(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
            discarding: None,
        }
    }
}

impl Decoder for RawLineCodec {
    type Item = RawLine;
    type Error = std::io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<RawLine>, std::io::Error> {
        loop {
            let newline = buf[self.next_index..]
                .iter()
                .position(|b| *b == b'\n')
                .map(|offset| self.next_index + offset);

            match (self.discarding, newline) {
                (Some(dropped), Some(at)) => {
                    buf.advance(at + 1);
                    self.discarding = None;
                    self.next_index = 0;
                    return Ok(Some(RawLine::Oversized(dropped + at)));
                }
                (Some(dropped), None) => {
                    let len = buf.len();
                    buf.advance(len);
                    self.discarding = Some(dropped + len);
                    self.next_index = 0;
                    return Ok(None);
                }
                (None, Some(at)) => {
                    let mut line = buf.split_to(at + 1);
                    self.next_index = 0;
                    if at > self.max_length {
                        return Ok(Some(RawLine::Oversized(at)));
                    }
                    line.truncate(at);
                    return Ok(Some(RawLine::Line(line.freeze())));
                }
                (None, None) if buf.len() > self.max_length => {
                    self.discarding = Some(0);
                }
                (None, None) => {
                    self.next_index = buf.len();
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<RawLine>, std::io::Error> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }
        self.next_index = 0;
        if let Some(dropped) = self.discarding.take() {
            return Ok(Some(RawLine::Oversized(dropped)));
        }
        if buf.is_empty() {
            return Ok(None);
        }
        // Last line without a trailing newline.
        let line = buf.split_to(buf.len());
        Ok(Some(RawLine::Line(line.freeze())))
    }
}

/// Decode one line of a generate stream.
///
/// Returns `None` for lines that carry nothing to emit: blank keep-alives and
/// chunks with an empty `response` (such as the final `done` line).
pub fn decode_line(line: &[u8]) -> Option<Result<String, StreamError>> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return None;
    }

    let chunk = match parse_chunk(line) {
        Ok(chunk) => chunk,
        Err(source) => {
            return Some(Err(StreamError::Decode {
                line: String::from_utf8_lossy(line)
                    .chars()
                    .take(LINE_PREVIEW_CHARS)
                    .collect(),
                source,
            }))
        }
    };

    if let Some(message) = chunk.error {
        return Some(Err(StreamError::Upstream(message)));
    }
    if chunk.response.is_empty() {
        return None;
    }
    Some(Ok(chunk.response))
}

/// Turn a raw body stream into a [`FragmentStream`].
pub fn fragments<S, E>(body: S) -> FragmentStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    fragments_with_limit(body, MAX_LINE_BYTES)
}

fn fragments_with_limit<S, E>(body: S, max_line_bytes: usize) -> FragmentStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let reader = StreamReader::new(body.map_err(std::io::Error::other));
    let lines = FramedRead::new(reader, RawLineCodec::new(max_line_bytes));

    Box::pin(lines.filter_map(|line| async move {
        match line {
            Ok(RawLine::Line(line)) => decode_line(&line),
            Ok(RawLine::Oversized(len)) => Some(Err(StreamError::Oversized { len })),
            Err(e) => Some(Err(StreamError::Transport(e))),
        }
    }))
}
