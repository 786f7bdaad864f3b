//! Bounded command-line framing
//!
//! Splits a byte stream into command lines without ever buffering more than
//! `max_line_bytes + 1` bytes of one line. An overlong line is reported as
//! soon as the limit is crossed, before its newline arrives, and the rest of
//! it is skipped. Lines that are not UTF-8 are reported and skipped too, so
//! one bad line never ends a session.

use bytes::{Buf, BytesMut};
use std::io;
use tokio_util::codec::Decoder;

/// One framed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    /// A complete line, without its terminator
    Command(String),
    /// The line grew past the limit
    TooLong,
    /// The line was not valid UTF-8
    NotUtf8,
}

/// Newline-delimited decoder with a per-line size limit
#[derive(Debug, Clone)]
pub struct CommandCodec {
    /// Longest accepted line, terminator excluded
    max_line_bytes: usize,
    /// Skipping the tail of an overlong line
    discarding: bool,
}

impl CommandCodec {
    pub fn new(max_line_bytes: usize) -> Self {
        Self {
            max_line_bytes,
            discarding: false,
        }
    }
}

impl Decoder for CommandCodec {
    type Item = InputLine;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<InputLine>, io::Error> {
        if self.discarding {
            match src.iter().position(|&b| b == b'\n') {
                Some(newline) => {
                    src.advance(newline + 1);
                    self.discarding = false;
                }
                None => {
                    src.clear();
                    return Ok(None);
                }
            }
        }

        let window = src.len().min(self.max_line_bytes.saturating_add(1));
        match src[..window].iter().position(|&b| b == b'\n') {
            Some(newline) => {
                let line = src.split_to(newline + 1);
                Ok(Some(to_input(&line[..newline])))
            }
            None if src.len() > self.max_line_bytes => {
                src.clear();
                self.discarding = true;
                Ok(Some(InputLine::TooLong))
            }
            None => Ok(None),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<InputLine>, io::Error> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if self.discarding || src.is_empty() {
            src.clear();
            return Ok(None);
        }

        // Last line without a terminator
        let line = src.split();
        Ok(Some(to_input(&line)))
    }
}

fn to_input(bytes: &[u8]) -> InputLine {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(line) => InputLine::Command(line.to_string()),
        Err(_) => InputLine::NotUtf8,
    }
}
