//! NUL-delimited JSON framing.
//!
//! Each frame is a UTF-8 JSON document followed by a single `0x00`. JSON
//! text never contains a raw NUL, so the delimiter is unambiguous. The
//! decoder yields one `Result` per frame: a frame that fails to parse is
//! reported and skipped, and decoding carries on with the next frame.

use std::io;

use bytes::{Buf, BufMut, BytesMut};
use splitsync_common::FrameParseError;
use tokio_util::codec::{Decoder, Encoder};

use crate::message::Message;

pub const FRAME_DELIMITER: u8 = 0x00;

/// Frames larger than this are rejected when no limit is configured.
pub const DEFAULT_MAX_FRAME_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_frame_bytes: usize,
    /// Bytes of the buffer already scanned for a delimiter.
    scanned: usize,
    /// Dropping the tail of an oversized frame until its delimiter.
    discarding: bool,
}

impl FrameCodec {
    pub fn new(max_frame_bytes: usize) -> Self {
        Self {
            max_frame_bytes,
            scanned: 0,
            discarding: false,
        }
    }

    pub fn max_frame_bytes(&self) -> usize {
        self.max_frame_bytes
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_BYTES)
    }
}

impl Decoder for FrameCodec {
    type Item = Result<Message, FrameParseError>;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> io::Result<Option<Self::Item>> {
        loop {
            let from = self.scanned.min(src.len());
            let found = src[from..].iter().position(|b| *b == FRAME_DELIMITER);

            if self.discarding {
                match found {
                    Some(offset) => {
                        src.advance(from + offset + 1);
                        self.scanned = 0;
                        self.discarding = false;
                        continue;
                    }
                    None => {
                        src.clear();
                        self.scanned = 0;
                        return Ok(None);
                    }
                }
            }

            let Some(offset) = found else {
                if src.len() > self.max_frame_bytes {
                    let len = src.len();
                    src.clear();
                    self.scanned = 0;
                    self.discarding = true;
                    return Ok(Some(Err(FrameParseError::TooLarge {
                        len,
                        max: self.max_frame_bytes,
                    })));
                }
                self.scanned = src.len();
                return Ok(None);
            };

            let end = from + offset;
            let frame = src.split_to(end + 1);
            self.scanned = 0;

            let body = &frame[..end];
            if body.is_empty() {
                continue;
            }
            if body.len() > self.max_frame_bytes {
                return Ok(Some(Err(FrameParseError::TooLarge {
                    len: body.len(),
                    max: self.max_frame_bytes,
                })));
            }
            return Ok(Some(Message::from_json(body)));
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> io::Result<Option<Self::Item>> {
        if let Some(item) = self.decode(src)? {
            return Ok(Some(item));
        }
        if src.is_empty() {
            return Ok(None);
        }
        let len = src.len();
        src.clear();
        self.scanned = 0;
        Ok(Some(Err(FrameParseError::Truncated(len))))
    }
}

impl<'a> Encoder<&'a Message> for FrameCodec {
    type Error = io::Error;

    fn encode(&mut self, message: &'a Message, dst: &mut BytesMut) -> io::Result<()> {
        let json = message
            .to_json()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        if json.len() > self.max_frame_bytes {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                FrameParseError::TooLarge {
                    len: json.len(),
                    max: self.max_frame_bytes,
                },
            ));
        }
        dst.reserve(json.len() + 1);
        dst.put_slice(&json);
        dst.put_u8(FRAME_DELIMITER);
        Ok(())
    }
}
