//! The data-link type of a trace's captured frames.
//!
//! The pcap file header and the pcap-ng Interface Description Block both
//! carry this as an on-disk integer identifying the link-layer protocol
//! (Ethernet, raw IP, ...); the full registry lives at
//! <https://www.tcpdump.org/linktypes.html>. Earlier drafts of this reader
//! narrowed the value to 16 bits and decoded a large enum of named
//! variants, but the pcap-ng IDB field is 16 bits with the high bits of the
//! enclosing `u32` reserved, while the *pcap* file header's field is a full
//! 32 bits — truncating it silently drops information (e.g. the
//! FCS-length bits some writers set in the upper half). This crate keeps
//! the on-disk value intact as a transparent newtype instead.

/// The raw data-link type code for a trace or interface.
///
/// Common values include `1` (Ethernet), `101` (raw IP), and `0` (BSD
/// loopback); see the linktype registry linked above for the rest. This
/// type intentionally doesn't enumerate them — it's a thin, lossless
/// wrapper around the on-disk code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct LinkType(pub u32);

impl LinkType {
    pub const ETHERNET: LinkType = LinkType(1);
    pub const RAW: LinkType = LinkType(101);

    /// The raw on-disk code.
    pub fn code(self) -> u32 {
        self.0
    }
}

impl From<u32> for LinkType {
    fn from(code: u32) -> Self {
        LinkType(code)
    }
}

impl From<u16> for LinkType {
    fn from(code: u16) -> Self {
        LinkType(u32::from(code))
    }
}

impl std::fmt::Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "linktype {}", self.0)
    }
}
