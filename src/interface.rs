use crate::link_type::LinkType;

/// The resolution at which an interface's packets are timestamped.
///
/// Decoded from the `if_tsresol` option (a single byte: the low 7 bits are
/// an exponent, the high bit selects the base). Absent `if_tsresol` options
/// default to `Base10` with exponent 6, i.e. microseconds, per the
/// pcap-ng format's stated default.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimestampResolution {
    /// One tick is `10.pow(-exponent)` seconds.
    Base10 { exponent: u32 },
    /// One tick is `2.pow(-exponent)` seconds.
    Base2 { exponent: u32 },
}

impl Default for TimestampResolution {
    fn default() -> Self {
        TimestampResolution::Base10 { exponent: 6 }
    }
}

impl TimestampResolution {
    /// Parse the raw `if_tsresol` option byte.
    pub(crate) fn from_raw(raw: u8) -> TimestampResolution {
        let exponent = u32::from(raw & 0b0111_1111);
        if raw >> 7 == 0 {
            TimestampResolution::Base10 { exponent }
        } else {
            TimestampResolution::Base2 { exponent }
        }
    }

    /// Split a 64-bit tick count into whole seconds and microsecond-normalised
    /// subseconds.
    pub(crate) fn split_ticks(self, ticks: u64) -> (u64, u32) {
        let units_per_sec = match self {
            TimestampResolution::Base10 { exponent } => 10u64.saturating_pow(exponent),
            TimestampResolution::Base2 { exponent } => 1u64 << exponent.min(63),
        };
        let secs = ticks / units_per_sec;
        // The multiply can overflow u64 for a large remainder at a coarse
        // resolution (e.g. base-10 exponent >= 14), so widen before it.
        let subsec_us = (u128::from(ticks % units_per_sec) * 1_000_000 / u128::from(units_per_sec)) as u32;
        (secs, subsec_us)
    }
}

/// An interface a pcap-ng trace captured packets from, decoded from its
/// Interface Description Block.
///
/// Every field beyond `link_type` and `timestamp_resolution` is optional
/// because the corresponding IDB option may simply be absent. String
/// fields borrow directly from the trace's byte source rather than being
/// copied.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TraceInterface<'a> {
    pub link_type: LinkType,
    pub timestamp_resolution: TimestampResolution,
    /// The exact `if_tsresol` byte as it appeared on disk, distinguishing
    /// "absent, defaulted" from "explicitly set to the same value".
    pub timestamp_resolution_raw: Option<u8>,
    /// Maximum captured length per packet; `None` means unlimited (an
    /// on-disk value of zero).
    pub snap_len: Option<u32>,
    pub comment: Option<&'a str>,
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub filter: Option<&'a str>,
    pub os: Option<&'a str>,
    pub hardware: Option<&'a str>,
    pub mac_addr: Option<[u8; 6]>,
}

/// Capture statistics for one interface, decoded from an Interface
/// Statistics Block.
///
/// This has no counterpart in [`Packet`][crate::Packet] or
/// [`TraceInterface`] — ISBs can appear any number of times, at any point in
/// the file, for the same interface — so the cursor accumulates one entry
/// per ISB seen, in file order, rather than folding them into per-interface
/// state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct InterfaceStatistics {
    pub interface_id: u32,
    pub timestamp_seconds: u64,
    pub timestamp_subseconds: u32,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    pub packets_received: Option<u64>,
    pub packets_dropped_by_interface: Option<u64>,
    pub packets_accepted_by_filter: Option<u64>,
    pub packets_dropped_by_os: Option<u64>,
    pub packets_delivered_to_user: Option<u64>,
}
