//! Enhanced Packet Block — the standard packet-bearing block in modern
//! pcap-ng files.
//!
//! Carries the capturing interface's id, a 64-bit timestamp split into
//! high and low 32-bit halves, the captured and original lengths, and the
//! packet payload. The `epb_*` options that can follow (`epb_flags`,
//! `epb_hash`, `epb_dropcount`, ...) aren't decoded here; only the fixed
//! header fields needed to populate a packet view are read. Converting
//! the raw tick count into seconds and subseconds is left to the caller,
//! which knows which interface's timestamp resolution applies.

use super::util::{read_ticks, Reader, Ticks};
use crate::error::Result;

pub(crate) struct EnhancedPacket<'a> {
    pub interface_id: u32,
    pub ticks: Ticks,
    pub captured_len: u32,
    pub original_len: u32,
    pub data: &'a [u8],
}

pub(crate) fn parse<'a>(body: &'a [u8], base_offset: u64) -> Result<EnhancedPacket<'a>> {
    let mut r = Reader::new(body, base_offset);
    let interface_id = r.read_u32()?;
    let ticks = read_ticks(&mut r)?;
    let captured_len = r.read_u32()?;
    let original_len = r.read_u32()?;
    let data = r.read_bytes_padded(captured_len)?;
    // Any options (epb_flags, epb_hash, ...) that follow are not surfaced.
    Ok(EnhancedPacket {
        interface_id,
        ticks,
        captured_len,
        original_len,
        data,
    })
}
