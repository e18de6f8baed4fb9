//! Line-based codec for tokio.
//!
//! Reads newline-terminated lines and writes CRLF-terminated ones. Oversized
//! lines are skipped rather than failing the stream.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::error;
use crate::message::Message;

/// Default ceiling for one inbound line, terminator excluded.
pub const DEFAULT_MAX_LINE: usize = 8191;

/// Line-based codec that handles newline-terminated messages.
///
/// Decoded lines have trailing whitespace removed and are decoded as UTF-8
/// lossily. Blank lines are never yielded.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Dropping bytes until the next newline
    discarding: bool,
}

impl LineCodec {
    /// Create a codec with the default line ceiling.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE)
    }

    /// Create a codec with a custom line ceiling.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    fn finish_line(raw: &[u8]) -> Option<String> {
        let text = String::from_utf8_lossy(raw);
        let trimmed = text.trim_end();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        loop {
            let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
                if src.len() > self.max_len {
                    if !self.discarding {
                        warn!(limit = self.max_len, "Inbound line too long, discarding");
                    }
                    self.discarding = true;
                    src.clear();
                    self.next_index = 0;
                } else {
                    self.next_index = src.len();
                }
                return Ok(None);
            };

            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if std::mem::take(&mut self.discarding) {
                continue;
            }

            let content = &line[..line.len() - 1];
            if content.len() > self.max_len {
                warn!(
                    actual = content.len(),
                    limit = self.max_len,
                    "Inbound line too long, discarding"
                );
                continue;
            }

            if let Some(text) = Self::finish_line(content) {
                return Ok(Some(text));
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        let rest = src.split();
        self.next_index = 0;
        if std::mem::take(&mut self.discarding) {
            return Ok(None);
        }
        Ok(Self::finish_line(&rest))
    }
}

impl Encoder<String> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        let body = msg.trim_end_matches(['\r', '\n']);
        dst.reserve(body.len() + 2);
        dst.extend_from_slice(body.as_bytes());
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}

impl Encoder<&Message> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: &Message, dst: &mut BytesMut) -> error::Result<()> {
        Encoder::<String>::encode(self, msg.to_string(), dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_complete_line_trimmed() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :test \r\n");

        assert_eq!(codec.decode(&mut buf).unwrap(), Some("PING :test".to_string()));
        assert!(buf.is_empty());
    }

    #[test]
    fn waits_for_partial_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :");
        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"x\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("PING :x".to_string()));
    }

    #[test]
    fn skips_blank_lines() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("\r\n  \r\nNICK alice\r\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("NICK alice".to_string()));
    }

    #[test]
    fn discards_oversized_line_and_continues() {
        let mut codec = LineCodec::with_max_len(10);
        let mut buf = BytesMut::from("this is way too long\nNICK bob\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("NICK bob".to_string()));
    }

    #[test]
    fn discards_oversized_partial_across_reads() {
        let mut codec = LineCodec::with_max_len(10);
        let mut buf = BytesMut::from("0123456789ABCDEF");
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.is_empty());

        buf.extend_from_slice(b"tail\nPING x\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("PING x".to_string()));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PRIVMSG #1 :\xffok\n"[..]);
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some("PRIVMSG #1 :\u{fffd}ok".to_string())
        );
    }

    #[test]
    fn eof_yields_unterminated_tail() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("QUIT");
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), Some("QUIT".to_string()));
    }

    #[test]
    fn encode_appends_crlf() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        codec.encode("PONG :test".to_string(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"PONG :test\r\n");
    }
}
