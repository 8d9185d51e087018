//! The pcap-ng option-list sub-format: `(code: u16, length: u16, value)`
//! triples, padded to 32 bits, terminated by `opt_endofopt` (code 0).
//! Every block type beyond the generic envelope ends its body with zero or
//! more of these.

use super::util::Reader;
use crate::error::{Error, Result};

/// Walk the option list at the tail of a block body, calling `handle` for
/// every option that isn't `opt_endofopt`. `opt_comment` (code 1) is a
/// regular option as far as this parser is concerned — every block kind
/// that carries a `comment` field matches on code 1 itself.
///
/// Stops cleanly at `opt_endofopt`, or at the end of the buffer if no
/// terminator is present — a writer that simply ran out of body without
/// an explicit terminator is not malformed. A declared option length that
/// would read past the body *is* malformed, though: unlike a missing
/// terminator, a length pointing past the block's own envelope means the
/// file is lying about its own structure, so that case fails
/// `MalformedOption` instead of stopping silently.
pub(crate) fn parse_options<'a>(
    body: &'a [u8],
    base_offset: u64,
    mut handle: impl FnMut(u16, &'a [u8]),
) -> Result<()> {
    let mut r = Reader::new(body, base_offset);
    while r.remaining() >= 4 {
        let opt_offset = base_offset + (body.len() - r.remaining()) as u64;
        let code = r.read_u16()?;
        let len = r.read_u16()?;
        let value = r.read_bytes_padded(u32::from(len)).map_err(|_| Error::MalformedOption {
            offset: opt_offset,
            reason: format!("option (code {code}) declares length {len}, which exceeds the containing block body"),
        })?;
        // opt_endofopt MUST NOT be repeated and ends the list.
        if code == 0 {
            break;
        }
        handle(code, value);
    }
    Ok(())
}

/// Interpret an option value as a lossy UTF-8 string, per the pcap-ng
/// convention that string options are "not zero-terminated".
pub(crate) fn as_str(value: &[u8]) -> &str {
    match std::str::from_utf8(value) {
        Ok(s) => s,
        Err(e) => std::str::from_utf8(&value[..e.valid_up_to()]).unwrap_or(""),
    }
}

pub(crate) fn as_array<const N: usize>(value: &[u8]) -> Option<[u8; N]> {
    value.try_into().ok()
}

pub(crate) fn as_u32_le(value: &[u8]) -> Option<u32> {
    Some(u32::from_le_bytes(value.try_into().ok()?))
}

pub(crate) fn as_u64_le(value: &[u8]) -> Option<u64> {
    Some(u64::from_le_bytes(value.try_into().ok()?))
}
