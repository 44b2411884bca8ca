use serde::Serialize;

use super::error::DecodeError;
use super::layout;

/// Offset and length of a run of bytes inside a datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ByteRange {
    pub start: usize,
    pub len: usize,
}

impl ByteRange {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn between(start: usize, end: usize) -> Self {
        Self {
            start,
            len: end.saturating_sub(start),
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// A value together with the bytes it was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned<T> {
    pub range: ByteRange,
    pub value: T,
}

/// Forward-only reader over one datagram.
///
/// Every read either consumes exactly the requested bytes or fails and leaves
/// the position untouched, so a failed decode can still report where it
/// stopped.
///
/// # Examples
/// ```
/// use hazelshark_core::ByteCursor;
///
/// let mut cursor = ByteCursor::new(&[0x01, 0xAC, 0x02]);
/// assert_eq!(cursor.read_u8().unwrap().value, 0x01);
/// assert_eq!(cursor.read_packed_u32().unwrap().value, 300);
/// assert!(cursor.is_exhausted());
/// assert!(cursor.read_u8().is_err());
/// assert_eq!(cursor.position(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.buffer.len()
    }

    pub fn read(&mut self, len: usize) -> Result<Spanned<&'a [u8]>, DecodeError> {
        let start = self.position;
        let bytes = start
            .checked_add(len)
            .and_then(|end| self.buffer.get(start..end))
            .ok_or(DecodeError::OutOfBounds {
                offset: start,
                needed: len,
                available: self.remaining(),
            })?;
        self.position += len;
        Ok(Spanned {
            range: ByteRange::new(start, len),
            value: bytes,
        })
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<Spanned<[u8; N]>, DecodeError> {
        let chunk = self.read(N)?;
        let mut value = [0u8; N];
        value.copy_from_slice(chunk.value);
        Ok(Spanned {
            range: chunk.range,
            value,
        })
    }

    pub fn read_u8(&mut self) -> Result<Spanned<u8>, DecodeError> {
        let chunk = self.read_array::<1>()?;
        Ok(Spanned {
            range: chunk.range,
            value: chunk.value[0],
        })
    }

    pub fn read_u16_le(&mut self) -> Result<Spanned<u16>, DecodeError> {
        let chunk = self.read_array::<2>()?;
        Ok(Spanned {
            range: chunk.range,
            value: u16::from_le_bytes(chunk.value),
        })
    }

    pub fn read_u16_be(&mut self) -> Result<Spanned<u16>, DecodeError> {
        let chunk = self.read_array::<2>()?;
        Ok(Spanned {
            range: chunk.range,
            value: u16::from_be_bytes(chunk.value),
        })
    }

    pub fn read_u32_le(&mut self) -> Result<Spanned<u32>, DecodeError> {
        let chunk = self.read_array::<4>()?;
        Ok(Spanned {
            range: chunk.range,
            value: u32::from_le_bytes(chunk.value),
        })
    }

    /// Reads a packed integer: seven data bits per byte, least significant
    /// group first, high bit set while more bytes follow.
    ///
    /// The value keeps the raw 32-bit pattern, so a fifth group reaching bit 31
    /// yields a negative number; use [`ByteCursor::read_packed_u32`] for the
    /// unsigned view. On failure the cursor is rewound to the first byte of
    /// the integer.
    pub fn read_packed(&mut self) -> Result<Spanned<i32>, DecodeError> {
        let start = self.position;
        let mut output = 0u32;

        for group in 0..layout::PACKED_MAX_LEN {
            let byte = match self.read_u8() {
                Ok(byte) => byte.value,
                Err(err) => {
                    self.position = start;
                    return Err(err);
                }
            };
            output |= u32::from(byte & layout::PACKED_DATA_MASK) << (7 * group as u32);
            if byte & layout::PACKED_CONTINUATION == 0 {
                return Ok(Spanned {
                    range: ByteRange::between(start, self.position),
                    value: output as i32,
                });
            }
        }

        self.position = start;
        Err(DecodeError::MalformedVarInt {
            offset: start,
            max_len: layout::PACKED_MAX_LEN,
        })
    }

    pub fn read_packed_u32(&mut self) -> Result<Spanned<u32>, DecodeError> {
        let packed = self.read_packed()?;
        Ok(Spanned {
            range: packed.range,
            value: packed.value as u32,
        })
    }
}
