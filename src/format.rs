//! Every format this crate reads announces itself with a distinct leading
//! 32-bit magic number, so the very first thing `open_reader` does is read
//! it and dispatch on it — no other bytes need to be looked at yet.

use crate::error::{Error, Result};

/// Which on-disk encoding a trace file uses, as determined by its leading
/// magic number.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Format {
    /// Classic pcap, `ts_subsec` counted in microseconds.
    PcapMicros,
    /// Classic pcap, `ts_subsec` counted in nanoseconds.
    PcapNanos,
    /// Block-structured pcap-ng.
    PcapNg,
    /// A single zstd frame, expected to contain pcap-ng once decompressed.
    Zstd,
}

const MAGIC_PCAP_MICROS: u32 = 0xA1B2_C3D4;
const MAGIC_PCAP_NANOS: u32 = 0xA1B2_3C4D;
const MAGIC_PCAPNG: u32 = 0x0A0D_0D0A;
const MAGIC_ZSTD: u32 = 0xFD2F_B528;

pub(crate) fn probe(bytes: &[u8]) -> Result<Format> {
    if bytes.len() < 4 {
        return Err(Error::TooShort {
            format: "magic number",
            needed: 4,
            found: bytes.len(),
        });
    }
    let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    match magic {
        MAGIC_PCAP_MICROS => Ok(Format::PcapMicros),
        MAGIC_PCAP_NANOS => Ok(Format::PcapNanos),
        MAGIC_PCAPNG => Ok(Format::PcapNg),
        MAGIC_ZSTD => Ok(Format::Zstd),
        other => Err(Error::UnknownFormat(other)),
    }
}
