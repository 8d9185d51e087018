//! Interface Description Block.
//!
//! Describes one interface packets were captured from: its link type,
//! snap length, and an option list carrying its name, description, BPF
//! filter, operating system, hardware, MAC address, and timestamp
//! resolution. Every field beyond link type and snap length comes from an
//! option, so it's only present if the writer chose to include it.
//! Options this crate doesn't recognise (`if_IPv4addr`, `if_speed`,
//! `if_tzone`, ...) are simply skipped by the option parser's catch-all
//! arm.

use super::opts::{as_array, as_str, parse_options};
use super::util::Reader;
use crate::error::Result;
use crate::interface::{TimestampResolution, TraceInterface};
use crate::link_type::LinkType;

pub(crate) fn parse<'a>(body: &'a [u8], base_offset: u64) -> Result<TraceInterface<'a>> {
    let mut r = Reader::new(body, base_offset);
    let link_type = LinkType::from(r.read_u16()?);
    r.advance(2)?; // reserved
    let snap_len = match r.read_u32()? {
        0 => None,
        x => Some(x),
    };

    let mut iface = TraceInterface {
        link_type,
        timestamp_resolution: TimestampResolution::default(),
        timestamp_resolution_raw: None,
        snap_len,
        comment: None,
        name: None,
        description: None,
        filter: None,
        os: None,
        hardware: None,
        mac_addr: None,
    };

    parse_options(r.rest(), base_offset, |code, value| match code {
        1 => iface.comment = Some(as_str(value)),
        2 => iface.name = Some(as_str(value)),
        3 => iface.description = Some(as_str(value)),
        6 => iface.mac_addr = as_array::<6>(value),
        9 => {
            if let [raw] = value {
                iface.timestamp_resolution_raw = Some(*raw);
                iface.timestamp_resolution = TimestampResolution::from_raw(*raw);
            }
        }
        11 => iface.filter = Some(as_str(value)),
        12 => iface.os = Some(as_str(value)),
        15 => iface.hardware = Some(as_str(value)),
        _ => (),
    })?;

    Ok(iface)
}
