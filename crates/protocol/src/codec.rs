//! Byte-level primitives: varints and length-prefixed UTF-8 strings.
//!
//! A varint stores a 32-bit value in 7-bit groups, least significant first,
//! with the high bit of each byte set while more bytes follow. Signed values
//! go through their two's-complement `u32`, so negatives take five bytes.

/// Longest encoding of a 32-bit varint.
pub const MAX_VARINT_LEN: usize = 5;
/// Longest string, in UTF-8 bytes, a reader accepts.
pub const MAX_STRING_LEN: usize = 32767;

/// Why a payload could not be decoded. Any of these aborts the whole message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of message: needed {needed} bytes, {remaining} left")]
    UnexpectedEof { needed: usize, remaining: usize },
    #[error("varint longer than 5 bytes")]
    VarIntTooLong,
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    #[error("string of {len} bytes exceeds the 32767 byte limit")]
    StringTooLong { len: usize },
    #[error("count {count} cannot fit in the {remaining} bytes left")]
    LengthOverflow { count: usize, remaining: usize },
    #[error("`{0}` is not a `namespace:path` material identifier")]
    InvalidMaterial(String),
    #[error("{0} unread bytes after the end of the message")]
    TrailingBytes(usize),
}

/// Appends wire primitives to a growable buffer.
#[derive(Debug, Clone, Default)]
pub struct PacketWriter {
    buf: Vec<u8>,
}

impl PacketWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_var_u32(&mut self, mut value: u32) {
        loop {
            let byte = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | 0x80);
        }
    }

    pub fn write_var_i32(&mut self, value: i32) {
        self.write_var_u32(value as u32);
    }

    /// Collection length as a varint.
    pub fn write_count(&mut self, count: usize) {
        self.write_var_u32(u32::try_from(count).unwrap_or(u32::MAX));
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_count(value.len());
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Reads wire primitives from a borrowed payload.
#[derive(Debug, Clone)]
pub struct PacketReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let byte = *self.buf.get(self.pos).ok_or(DecodeError::UnexpectedEof {
            needed: 1,
            remaining: 0,
        })?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(DecodeError::UnexpectedEof {
                needed: len,
                remaining,
            });
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_var_u32(&mut self) -> Result<u32, DecodeError> {
        let mut value = 0u32;
        for group in 0..MAX_VARINT_LEN {
            let byte = self.read_u8()?;
            value |= u32::from(byte & 0x7F) << (7 * group);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::VarIntTooLong)
    }

    pub fn read_var_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(self.read_var_u32()? as i32)
    }

    /// Collection length, rejected up front if `count` items of at least
    /// `min_item_len` bytes each cannot fit in what is left.
    pub fn read_count(&mut self, min_item_len: usize) -> Result<usize, DecodeError> {
        let count = self.read_var_u32()? as usize;
        let remaining = self.remaining();
        if count.saturating_mul(min_item_len) > remaining {
            return Err(DecodeError::LengthOverflow { count, remaining });
        }
        Ok(count)
    }

    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_var_u32()? as usize;
        if len > MAX_STRING_LEN {
            return Err(DecodeError::StringTooLong { len });
        }
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8)
    }

    /// Fail if anything is left unread.
    pub fn finish(self) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            left => Err(DecodeError::TrailingBytes(left)),
        }
    }
}
