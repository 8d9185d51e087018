//! Section Header Block.
//!
//! The mandatory block that opens every pcap-ng section: a byte-order
//! magic number (used by readers to detect and, in principle, compensate
//! for endianness), a format version, an optional declared section
//! length, and an option list of free-form annotations (comment,
//! hardware, OS, user application). Only the native little-endian byte
//! order magic is accepted here; any other value is rejected rather than
//! silently byte-swapped.

use super::opts::{as_str, parse_options};
use super::util::Reader;
use crate::error::{Error, Result};

const BYTE_ORDER_MAGIC_LE: u32 = 0x1A2B_3C4D;

/// Per-section annotations decoded from a Section Header Block's options.
///
/// A new SHB replaces this wholesale: section metadata is a single
/// current-section slot, not a history of every section seen so far.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SectionMetadata<'a> {
    pub major_version: u16,
    pub minor_version: u16,
    /// `None` when the writer didn't know the section's length
    /// (the on-disk sentinel `-1`).
    pub section_length: Option<u64>,
    pub comment: Option<&'a str>,
    pub hardware: Option<&'a str>,
    pub os: Option<&'a str>,
    pub user_application: Option<&'a str>,
}

pub(crate) fn parse<'a>(body: &'a [u8], base_offset: u64) -> Result<SectionMetadata<'a>> {
    let mut r = Reader::new(body, base_offset);
    r.advance(4)?; // byte-order magic; already checked by the caller
    let major_version = r.read_u16()?;
    let minor_version = r.read_u16()?;
    let section_length = match r.read_i64()? {
        -1 => None,
        x => match u64::try_from(x) {
            Ok(x) => Some(x),
            Err(_) => return Err(Error::MalformedBlock {
                offset: base_offset,
                reason: format!("SHB section_length {x} is negative but not the -1 sentinel"),
            }),
        },
    };

    let mut meta = SectionMetadata {
        major_version,
        minor_version,
        section_length,
        ..SectionMetadata::default()
    };
    parse_options(r.rest(), base_offset, |code, value| match code {
        1 => meta.comment = Some(as_str(value)),
        2 => meta.hardware = Some(as_str(value)),
        3 => meta.os = Some(as_str(value)),
        4 => meta.user_application = Some(as_str(value)),
        _ => (),
    })?;
    Ok(meta)
}

/// Verify the section's byte-order magic. Only the native little-endian
/// value is accepted; any other byte order, including the valid big-endian
/// magic, is rejected rather than compensated for.
pub(crate) fn check_byte_order(magic: u32, offset: u64) -> Result<()> {
    if magic == BYTE_ORDER_MAGIC_LE {
        Ok(())
    } else {
        Err(Error::UnsupportedByteOrder(magic))
    }
}
