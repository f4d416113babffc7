use anyhow::Result;
use futures::{Stream, StreamExt};
use std::fmt::Display;

use crate::traits::CompletionStream;
use crate::StreamEvent;

/// Accumulates raw bytes and hands back whole `\n`-terminated lines
///
/// A chunk can end mid-line or mid-character; such bytes wait for the next
/// `extend`. Bytes already checked for a newline are not scanned again.
#[derive(Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
    start: usize,
    scanned: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        if self.start > 0 && self.start == self.pending.len() {
            self.pending.clear();
            self.start = 0;
            self.scanned = 0;
        }
        self.pending.extend_from_slice(bytes);
    }

    /// Next complete line, with `\n` or `\r\n` stripped
    pub fn next_line(&mut self) -> Option<Result<String>> {
        let offset = self.pending[self.scanned..].iter().position(|&b| b == b'\n');
        let Some(offset) = offset else {
            self.scanned = self.pending.len();
            return None;
        };
        let end = self.scanned + offset;
        let raw = &self.pending[self.start..end];
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = String::from_utf8(raw.to_vec())
            .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in stream line: {}", e));

        self.start = end + 1;
        self.scanned = self.start;
        if self.start > 4096 && self.start * 2 > self.pending.len() {
            self.pending.drain(..self.start);
            self.scanned -= self.start;
            self.start = 0;
        }
        Some(line)
    }

    /// Bytes held back waiting for a terminator
    pub fn len(&self) -> usize {
        self.pending.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Strategy for turning SSE `data:` payloads into stream events
pub trait SseLineParser: Send {
    fn parse_data_line(&self, data: &str) -> Result<Vec<StreamEvent>>;

    fn is_done_marker(&self, data: &str) -> bool {
        data == "[DONE]"
    }
}

/// Parse a raw byte stream of server-sent events
///
/// Lines that are not `data:` lines (comments, `event:`, blanks) are skipped.
/// The first transport or parse error is yielded and ends the stream.
pub fn parse_sse_stream<S, B, E, P>(bytes: S, parser: P) -> CompletionStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: Display + Send,
    P: SseLineParser + 'static,
{
    Box::pin(async_stream::stream! {
        let mut byte_chunks = Box::pin(bytes);
        let mut buffer = LineBuffer::new();

        'outer: while let Some(chunk_result) = byte_chunks.next().await {
            let chunk = match chunk_result {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(anyhow::anyhow!("Stream error: {}", e));
                    break;
                }
            };
            buffer.extend(chunk.as_ref());

            while let Some(line_result) = buffer.next_line() {
                let line = match line_result {
                    Ok(line) => line,
                    Err(e) => {
                        yield Err(e);
                        break 'outer;
                    }
                };

                let Some(data) = line.strip_prefix("data:") else {
                    continue;
                };
                let data = data.trim();

                if parser.is_done_marker(data) {
                    yield Ok(StreamEvent::done());
                    break 'outer;
                }

                match parser.parse_data_line(data) {
                    Ok(events) => {
                        for event in events {
                            yield Ok(event);
                        }
                    }
                    Err(e) => {
                        yield Err(e);
                        break 'outer;
                    }
                }
            }
        }
    })
}
