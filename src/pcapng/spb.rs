//! Simple Packet Block — a lightweight packet container with no interface
//! id and no timestamp, always implicitly attributed to interface 0.
//!
//! The only field is the packet's on-the-wire length; the payload that
//! follows is truncated to the capturing interface's snap length, since
//! unlike an Enhanced Packet Block there's no separate captured-length
//! field to trust.

use super::util::Reader;
use crate::error::Result;

pub(crate) struct SimplePacket<'a> {
    pub original_len: u32,
    pub data: &'a [u8],
}

/// `snap_len` is the snaplen of interface 0, used to compute how many of
/// the declared `original_len` bytes were actually captured.
pub(crate) fn parse<'a>(body: &'a [u8], base_offset: u64, snap_len: Option<u32>) -> Result<SimplePacket<'a>> {
    let mut r = Reader::new(body, base_offset);
    let original_len = r.read_u32()?;
    let captured_len = match snap_len {
        Some(snap) => original_len.min(snap),
        None => original_len,
    };
    let data = r.read_bytes_padded(captured_len)?;
    Ok(SimplePacket { original_len, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_to_snaplen() {
        let mut body = Vec::new();
        body.extend_from_slice(&8u32.to_le_bytes());
        body.extend_from_slice(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let spb = parse(&body, 0, Some(4)).unwrap();
        assert_eq!(spb.original_len, 8);
        assert_eq!(spb.data, &[1, 2, 3, 4]);
    }

    #[test]
    fn uses_original_len_when_no_snaplen() {
        let mut body = Vec::new();
        body.extend_from_slice(&4u32.to_le_bytes());
        body.extend_from_slice(&[1, 2, 3, 4]);
        let spb = parse(&body, 0, None).unwrap();
        assert_eq!(spb.data, &[1, 2, 3, 4]);
    }
}
