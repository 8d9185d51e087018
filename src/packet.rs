use std::fmt::{self, Display, Formatter};

/// One packet record, borrowed from the cursor's underlying byte source.
///
/// `data` aliases the mapped file or decompressed buffer the cursor owns;
/// it cannot outlive the cursor that produced it, which is why this type
/// carries the lifetime `'a` rather than copying the payload. `captured_length
/// == data.len()` always holds, and `captured_length <= original_length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet<'a> {
    /// Whole seconds since the Unix epoch.
    pub timestamp_seconds: u64,
    /// The fractional part of the timestamp, normalised to microseconds
    /// (always `< 1_000_000`).
    pub timestamp_subseconds: u32,
    /// Bytes actually present in `data`.
    pub captured_length: u32,
    /// Bytes the packet had on the wire before any snaplen truncation.
    pub original_length: u32,
    /// Which [`TraceInterface`][crate::TraceInterface] this packet came
    /// from, or `-1` for formats (classic pcap, Simple Packet Blocks with
    /// no preceding IDB) that don't carry an explicit interface id.
    pub interface_index: i64,
    /// The captured bytes, starting with the link-layer header.
    pub data: &'a [u8],
}

impl<'a> Display for Packet<'a> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "[{}.{:06}] if={} len={}/{} {}",
            self.timestamp_seconds,
            self.timestamp_subseconds,
            self.interface_index,
            self.captured_length,
            self.original_length,
            String::from_utf8_lossy(self.data)
                .replace(|x: char| !x.is_ascii() || x.is_control(), ".")
        )
    }
}
