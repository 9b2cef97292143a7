//! Growable byte buffer with a read cursor.
//!
//! Primitives are little-endian: `i32` as 4 bytes, `f64` as 8 bytes (IEEE
//! 754), characters as 1 byte. Strings are written null-terminated; byte
//! blobs carry a 4-byte length prefix.
//!
//! Under [`ReadPolicy::Strict`] (the default) a read past the end of the
//! buffer is an error. [`ReadPolicy::Lenient`] instead yields zero values,
//! empty strings, and short blobs, leaving the cursor at the end.

use super::error::{SerialError, SerialErrorKind};
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// What a read does when the buffer runs out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadPolicy {
    #[default]
    Strict,
    Lenient,
}

#[derive(Clone, Debug, Default)]
pub struct SerialBuffer {
    data: BytesMut,
    pos: usize,
    policy: ReadPolicy,
}

impl SerialBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding a copy of `bytes`, cursor at the start.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: BytesMut::from(bytes),
            pos: 0,
            policy: ReadPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReadPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[inline]
    pub fn policy(&self) -> ReadPolicy {
        self.policy
    }

    #[inline]
    pub fn set_policy(&mut self, policy: ReadPolicy) {
        self.policy = policy;
    }

    /// Total number of bytes written.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Hand the contents off as an immutable [`Bytes`].
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Move the read cursor back to the start.
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    /// Drop all contents and rewind.
    pub fn clear(&mut self) {
        self.data.clear();
        self.pos = 0;
    }

    pub fn write_char(&mut self, c: u8) -> &mut Self {
        self.data.put_u8(c);
        self
    }

    pub fn write_int(&mut self, v: i32) -> &mut Self {
        self.data.put_i32_le(v);
        self
    }

    pub fn write_double(&mut self, v: f64) -> &mut Self {
        self.data.put_f64_le(v);
        self
    }

    /// Write `s` followed by a 0 byte. A string with an interior NUL could
    /// not be read back, so it is refused and nothing is written.
    pub fn write_string(&mut self, s: &str) -> Result<&mut Self, SerialError> {
        if let Some(nul) = s.bytes().position(|b| b == 0) {
            return Err(SerialError::invalid(format!(
                "string {s:?} has a NUL at byte {nul}"
            )));
        }
        self.data.put_slice(s.as_bytes());
        self.data.put_u8(0);
        Ok(self)
    }

    /// Write a 4-byte length followed by the raw bytes.
    pub fn write_bytes(&mut self, raw: &[u8]) -> Result<&mut Self, SerialError> {
        let len = checked_len(raw.len(), "byte blob")?;
        self.write_int(len);
        self.data.put_slice(raw);
        Ok(self)
    }

    pub fn read_char(&mut self) -> Result<u8, SerialError> {
        Ok(self.take(1, "char")?.map_or(0, |mut b| b.get_u8()))
    }

    pub fn read_int(&mut self) -> Result<i32, SerialError> {
        Ok(self.take(4, "int")?.map_or(0, |mut b| b.get_i32_le()))
    }

    pub fn read_double(&mut self) -> Result<f64, SerialError> {
        Ok(self.take(8, "double")?.map_or(0.0, |mut b| b.get_f64_le()))
    }

    /// Read up to the next 0 byte and consume it.
    pub fn read_string(&mut self) -> Result<String, SerialError> {
        let rest = &self.data[self.pos..];
        let (text, consumed) = match rest.iter().position(|&b| b == 0) {
            Some(nul) => (&rest[..nul], nul + 1),
            None if self.policy == ReadPolicy::Lenient => (rest, rest.len()),
            None => {
                return Err(SerialErrorKind::Truncated {
                    what: "string terminator",
                    needed: rest.len() + 1,
                    available: rest.len(),
                }
                .into());
            }
        };
        let s = String::from_utf8_lossy(text).into_owned();
        self.pos += consumed;
        Ok(s)
    }

    /// Read a length-prefixed blob.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, SerialError> {
        let len = self.read_int()?;
        let len = match usize::try_from(len) {
            Ok(n) => n,
            Err(_) if self.policy == ReadPolicy::Lenient => 0,
            Err(_) => {
                return Err(SerialError::invalid(format!("negative blob length {len}")));
            }
        };
        if len > self.remaining() && self.policy == ReadPolicy::Lenient {
            let raw = self.data[self.pos..].to_vec();
            self.pos = self.data.len();
            return Ok(raw);
        }
        Ok(self
            .take(len, "byte blob")?
            .map(<[u8]>::to_vec)
            .unwrap_or_default())
    }

    /// Next `n` bytes, advancing the cursor. `Ok(None)` is the lenient
    /// short read, after which the cursor sits at the end.
    fn take(&mut self, n: usize, what: &'static str) -> Result<Option<&[u8]>, SerialError> {
        let available = self.remaining();
        if n > available {
            return match self.policy {
                ReadPolicy::Strict => Err(SerialErrorKind::Truncated {
                    what,
                    needed: n,
                    available,
                }
                .into()),
                ReadPolicy::Lenient => {
                    self.pos = self.data.len();
                    Ok(None)
                }
            };
        }
        let start = self.pos;
        self.pos += n;
        Ok(Some(&self.data[start..start + n]))
    }
}

/// `n` as a 4-byte length prefix, or an error if it does not fit.
pub(crate) fn checked_len(n: usize, what: &str) -> Result<i32, SerialError> {
    i32::try_from(n)
        .map_err(|_| SerialError::invalid(format!("{what} length {n} exceeds i32::MAX")))
}

impl PartialEq for SerialBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}
