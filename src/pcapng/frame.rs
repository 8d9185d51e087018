//! Validate and slice the generic pcap-ng block envelope.
//!
//! Every block begins with a 32-bit type and a 32-bit total length, and
//! ends with that same total length repeated. The repeated copy lets a
//! reader walk the file backwards as well as forwards; this reader also
//! checks that the leading and trailing copies agree, since a capture
//! tool that disagrees with itself about a block's own length is corrupt,
//! not just exotic.

use crate::error::{Error, Result};

pub(crate) struct Frame<'a> {
    pub block_type: u32,
    pub body: &'a [u8],
    /// Total on-disk size of the block, including both length fields.
    pub total_length: u32,
}

/// Read one block's envelope at `buf[offset..]`.
///
/// `buf` is the whole trace; `offset` is where the block is expected to
/// start. Returns the parsed envelope plus the offset of the next block.
pub(crate) fn parse_frame(buf: &[u8], offset: u64) -> Result<(Frame<'_>, u64)> {
    let malformed = |reason: String| Error::MalformedBlock { offset, reason };

    let start = offset as usize;
    if buf.len() < start + 12 {
        return Err(Error::Truncated {
            offset,
            expected: 12,
            available: buf.len().saturating_sub(start),
        });
    }

    let block_type = u32::from_le_bytes(buf[start..start + 4].try_into().unwrap());
    let block_total_length = u32::from_le_bytes(buf[start + 4..start + 8].try_into().unwrap());

    if block_total_length < 12 {
        return Err(malformed(format!(
            "block_total_length {block_total_length} is smaller than the 12-byte envelope"
        )));
    }
    if block_total_length % 4 != 0 {
        return Err(malformed(format!(
            "block_total_length {block_total_length} is not a multiple of 4"
        )));
    }
    let end = start
        .checked_add(block_total_length as usize)
        .ok_or_else(|| malformed("block_total_length overflows the file offset".to_string()))?;
    if end > buf.len() {
        return Err(Error::Truncated {
            offset,
            expected: block_total_length as usize,
            available: buf.len() - start,
        });
    }

    let trailing_length =
        u32::from_le_bytes(buf[end - 4..end].try_into().unwrap());
    if trailing_length != block_total_length {
        return Err(malformed(format!(
            "leading block_total_length {block_total_length} doesn't match trailing copy {trailing_length}"
        )));
    }

    let body = &buf[start + 8..end - 4];
    Ok((
        Frame {
            block_type,
            body,
            total_length: block_total_length,
        },
        offset + u64::from(block_total_length),
    ))
}

/// Read just the byte-order magic out of a prospective Section Header
/// Block, without committing to the rest of the envelope. Used when a new
/// section begins to decide whether this reader can understand it at all.
pub(crate) fn peek_byte_order_magic(body: &[u8], offset: u64) -> Result<u32> {
    if body.len() < 4 {
        return Err(Error::Truncated {
            offset,
            expected: 4,
            available: body.len(),
        });
    }
    Ok(u32::from_le_bytes(body[0..4].try_into().unwrap()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(block_type: u32, body: &[u8]) -> Vec<u8> {
        let total = 12 + body.len() as u32;
        let mut out = Vec::new();
        out.extend_from_slice(&block_type.to_le_bytes());
        out.extend_from_slice(&total.to_le_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(&total.to_le_bytes());
        out
    }

    #[test]
    fn parses_a_well_formed_block() {
        let buf = block(1, &[9, 9, 9, 9]);
        let (frame, next) = parse_frame(&buf, 0).unwrap();
        assert_eq!(frame.block_type, 1);
        assert_eq!(frame.body, &[9, 9, 9, 9]);
        assert_eq!(next, buf.len() as u64);
    }

    #[test]
    fn rejects_mismatched_trailing_length() {
        let mut buf = block(1, &[9, 9, 9, 9]);
        let last = buf.len() - 1;
        buf[last] = 0xFF;
        assert!(matches!(
            parse_frame(&buf, 0),
            Err(Error::MalformedBlock { .. })
        ));
    }

    #[test]
    fn rejects_unaligned_length() {
        let mut buf = block(1, &[9, 9, 9, 9]);
        buf[4] = 13; // block_total_length no longer a multiple of 4
        assert!(matches!(
            parse_frame(&buf, 0),
            Err(Error::MalformedBlock { .. })
        ));
    }

    #[test]
    fn reports_truncation() {
        let buf = block(1, &[9, 9, 9, 9]);
        assert!(matches!(
            parse_frame(&buf[..buf.len() - 2], 0),
            Err(Error::Truncated { .. })
        ));
    }
}
