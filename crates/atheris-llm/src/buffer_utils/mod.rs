mod sse_parser;

pub use sse_parser::{LineBuffer, SseLineParser, parse_sse_stream};
