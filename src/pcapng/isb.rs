//! Interface Statistics Block.
//!
//! Carries running capture counters for one interface as of some instant —
//! packets received, dropped, filtered, delivered — via the `isb_*`
//! options. An interface can have any number of these scattered through a
//! section, so they're accumulated into a list rather than folded into the
//! interface's own descriptor.

use super::opts::{as_u64_le, parse_options};
use super::util::{read_ticks, Reader};
use crate::error::Result;
use crate::interface::InterfaceStatistics;

pub(crate) fn parse(body: &[u8], base_offset: u64) -> Result<InterfaceStatistics> {
    let mut r = Reader::new(body, base_offset);
    let interface_id = r.read_u32()?;
    let ticks = read_ticks(&mut r)?;
    // Resolution isn't known at this layer (ISBs aren't packets); record
    // the raw tick count split as if it were microsecond-resolution, the
    // pcap-ng default, since no referenced interface is consulted here.
    let timestamp_seconds = ticks.0 / 1_000_000;
    let timestamp_subseconds = (ticks.0 % 1_000_000) as u32;

    let mut stats = InterfaceStatistics {
        interface_id,
        timestamp_seconds,
        timestamp_subseconds,
        ..InterfaceStatistics::default()
    };
    parse_options(r.rest(), base_offset, |code, value| match code {
        2 => stats.start_time = as_u64_le(value),
        3 => stats.end_time = as_u64_le(value),
        4 => stats.packets_received = as_u64_le(value),
        5 => stats.packets_dropped_by_interface = as_u64_le(value),
        6 => stats.packets_accepted_by_filter = as_u64_le(value),
        7 => stats.packets_dropped_by_os = as_u64_le(value),
        8 => stats.packets_delivered_to_user = as_u64_le(value),
        _ => (),
    })?;
    Ok(stats)
}
