//! Bounds-checked little-endian reads over a block's body.
//!
//! Only native little-endian sections are supported; byte order other
//! than that is rejected up front when a section header is parsed, so
//! everything below this layer reads little-endian unconditionally.

use crate::error::{Error, Result};

/// A cursor over one block's body, used to decode its fixed fields and
/// then hand the remaining bytes to the option parser.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    /// Absolute file offset of `buf[0]`, used only to annotate errors.
    base_offset: u64,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8], base_offset: u64) -> Reader<'a> {
        Reader {
            buf,
            pos: 0,
            base_offset,
        }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn ensure(&self, len: usize) -> Result<()> {
        if self.remaining() < len {
            return Err(Error::Truncated {
                offset: self.base_offset + self.pos as u64,
                expected: len,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    pub(crate) fn advance(&mut self, len: usize) -> Result<()> {
        self.ensure(len)?;
        self.pos += len;
        Ok(())
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        let v = u16::from_le_bytes([self.buf[self.pos], self.buf[self.pos + 1]]);
        self.pos += 2;
        Ok(v)
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        let v = u32::from_le_bytes(self.buf[self.pos..self.pos + 4].try_into().unwrap());
        self.pos += 4;
        Ok(v)
    }

    pub(crate) fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        let v = u64::from_le_bytes(self.buf[self.pos..self.pos + 8].try_into().unwrap());
        self.pos += 8;
        Ok(v)
    }

    pub(crate) fn read_i64(&mut self) -> Result<i64> {
        self.ensure(8)?;
        let v = i64::from_le_bytes(self.buf[self.pos..self.pos + 8].try_into().unwrap());
        self.pos += 8;
        Ok(v)
    }

    /// Read `len` bytes, then skip the padding that aligns the following
    /// field to a 32-bit boundary (present after every variable-length
    /// field in pcap-ng: packet payloads, option values, ...).
    pub(crate) fn read_bytes_padded(&mut self, len: u32) -> Result<&'a [u8]> {
        let len = len as usize;
        let padding = (4 - len % 4) % 4;
        self.ensure(len + padding)?;
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len + padding;
        Ok(bytes)
    }

    /// The bytes from the current position to the end of the block body,
    /// e.g. the option list once the fixed fields have been consumed.
    pub(crate) fn rest(&mut self) -> &'a [u8] {
        let rest = &self.buf[self.pos..];
        self.pos = self.buf.len();
        rest
    }
}

/// A 64-bit tick count, whose units depend on the referenced interface's
/// `if_tsresol` option (see [`crate::interface::TimestampResolution`]).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Ticks(pub u64);

pub(crate) fn read_ticks(r: &mut Reader) -> Result<Ticks> {
    let hi = r.read_u32()?;
    let lo = r.read_u32()?;
    Ok(Ticks((u64::from(hi) << 32) | u64::from(lo)))
}
