//! (Legacy) Packet Block — deprecated, superseded by the Enhanced Packet
//! Block, but still seen in the wild.
//!
//! Same timestamp semantics as the Enhanced Packet Block; the only layout
//! differences are a 16-bit rather than 32-bit interface id and a
//! `drops_count` field this crate doesn't surface.

use super::util::{read_ticks, Reader, Ticks};
use crate::error::Result;

pub(crate) struct LegacyPacket<'a> {
    pub interface_id: u16,
    pub ticks: Ticks,
    pub captured_len: u32,
    pub original_len: u32,
    pub data: &'a [u8],
}

pub(crate) fn parse<'a>(body: &'a [u8], base_offset: u64) -> Result<LegacyPacket<'a>> {
    let mut r = Reader::new(body, base_offset);
    let interface_id = r.read_u16()?;
    r.advance(2)?; // drops_count, not surfaced
    let ticks = read_ticks(&mut r)?;
    let captured_len = r.read_u32()?;
    let original_len = r.read_u32()?;
    let data = r.read_bytes_padded(captured_len)?;
    Ok(LegacyPacket {
        interface_id,
        ticks,
        captured_len,
        original_len,
        data,
    })
}
