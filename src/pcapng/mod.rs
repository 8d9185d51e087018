//! pcap-ng is a self-describing stream of typed, length-prefixed blocks:
//! a Section Header Block starts a section, Interface Description Blocks
//! describe the interfaces packets were captured from, and packet-bearing
//! blocks (Enhanced Packet, legacy Packet, Simple Packet) carry the actual
//! captured bytes. Everything else — Interface Statistics, Name
//! Resolution, Decryption Secrets, Custom, and anything not recognised —
//! is valid to skip over.
//!
//! This walker reads from a plain byte slice rather than a file handle, so
//! the same code serves both a memory-mapped plain pcap-ng file and a
//! decompressed zstd-wrapped one; only how that slice was produced
//! differs.

mod epb;
mod frame;
mod idb;
mod isb;
mod opaque;
mod opts;
mod pb;
mod shb;
mod spb;
mod util;

pub use shb::SectionMetadata;

use crate::error::{Error, Result};
use crate::interface::{InterfaceStatistics, TraceInterface};
use crate::link_type::LinkType;
use crate::packet::Packet;
use opaque::WarnedOnce;
use tracing::trace;

const BLOCK_SHB: u32 = 0x0A0D_0D0A;
const BLOCK_IDB: u32 = 1;
const BLOCK_PB: u32 = 2;
const BLOCK_SPB: u32 = 3;
const BLOCK_NRB: u32 = 4;
const BLOCK_ISB: u32 = 5;
const BLOCK_EPB: u32 = 6;
const BLOCK_DSB: u32 = 0x0000_000A;
const BLOCK_CUSTOM_A: u32 = 0x0000_0BAD;
const BLOCK_CUSTOM_B: u32 = 0x4000_0BAD;

/// Walks the blocks of a pcap-ng trace, accumulating section and interface
/// state and yielding packets as they're found.
///
/// Only one section's state is tracked at a time: a new Section Header
/// Block replaces the current section metadata and interface list
/// wholesale rather than being appended to a history of sections.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    offset: u64,
    data_link_type: Option<LinkType>,
    section: SectionMetadata<'a>,
    interfaces: Vec<TraceInterface<'a>>,
    interface_stats: Vec<InterfaceStatistics>,
    warned: WarnedOnce,
}

impl<'a> Reader<'a> {
    /// `buf` is the whole trace (mapped file or decompressed frame);
    /// `start` is where the first Section Header Block begins (0, unless a
    /// caller ever needs to skip a preamble, which none currently do).
    pub(crate) fn new(buf: &'a [u8], start: u64) -> Result<Reader<'a>> {
        let mut r = Reader {
            buf,
            offset: start,
            data_link_type: None,
            section: SectionMetadata::default(),
            interfaces: Vec::new(),
            interface_stats: Vec::new(),
            warned: WarnedOnce::default(),
        };
        r.expect_shb()?;
        Ok(r)
    }

    fn expect_shb(&mut self) -> Result<()> {
        let (f, next) = frame::parse_frame(self.buf, self.offset)?;
        if f.block_type != BLOCK_SHB {
            return Err(Error::MalformedBlock {
                offset: self.offset,
                reason: format!(
                    "expected a Section Header Block (type {BLOCK_SHB:#010x}) first, found type {:#010x}",
                    f.block_type
                ),
            });
        }
        self.handle_shb(f.body)?;
        self.offset = next;
        Ok(())
    }

    fn handle_shb(&mut self, body: &'a [u8]) -> Result<()> {
        let magic = frame::peek_byte_order_magic(body, self.offset)?;
        shb::check_byte_order(magic, self.offset)?;
        self.section = shb::parse(body, self.offset)?;
        self.interfaces.clear();
        self.data_link_type = None;
        Ok(())
    }

    fn handle_idb(&mut self, body: &'a [u8]) -> Result<()> {
        let iface = idb::parse(body, self.offset)?;
        if self.data_link_type.is_none() {
            self.data_link_type = Some(iface.link_type);
        }
        self.interfaces.push(iface);
        Ok(())
    }

    fn interface(&self, index: usize) -> Result<&TraceInterface<'a>> {
        self.interfaces.get(index).ok_or(Error::OutOfRange {
            index: index as u32,
            len: self.interfaces.len(),
        })
    }

    fn snap_len_of_first_interface(&self) -> Option<u32> {
        self.interfaces.first().and_then(|i| i.snap_len)
    }

    /// Pulls the next packet out of the section, skipping and decoding
    /// metadata blocks along the way.
    pub(crate) fn next_packet(&mut self) -> Result<Option<Packet<'a>>> {
        loop {
            if self.offset >= self.buf.len() as u64 {
                return Ok(None);
            }
            let (f, next) = frame::parse_frame(self.buf, self.offset)?;
            let block_offset = self.offset;

            match f.block_type {
                BLOCK_SHB => {
                    self.handle_shb(f.body)?;
                    self.offset = next;
                }
                BLOCK_IDB => {
                    self.handle_idb(f.body)?;
                    self.offset = next;
                }
                BLOCK_EPB => {
                    let epb = epb::parse(f.body, block_offset)?;
                    let iface = self.interface(epb.interface_id as usize)?;
                    let (secs, subsecs) = iface.timestamp_resolution.split_ticks(epb.ticks.0);
                    let packet = Packet {
                        timestamp_seconds: secs,
                        timestamp_subseconds: subsecs,
                        captured_length: epb.captured_len,
                        original_length: epb.original_len,
                        interface_index: i64::from(epb.interface_id),
                        data: epb.data,
                    };
                    self.offset = next;
                    return Ok(Some(packet));
                }
                BLOCK_PB => {
                    let pb = pb::parse(f.body, block_offset)?;
                    let iface = self.interface(pb.interface_id as usize)?;
                    let (secs, subsecs) = iface.timestamp_resolution.split_ticks(pb.ticks.0);
                    let packet = Packet {
                        timestamp_seconds: secs,
                        timestamp_subseconds: subsecs,
                        captured_length: pb.captured_len,
                        original_length: pb.original_len,
                        interface_index: i64::from(pb.interface_id),
                        data: pb.data,
                    };
                    self.offset = next;
                    return Ok(Some(packet));
                }
                BLOCK_SPB => {
                    let snap_len = self.snap_len_of_first_interface();
                    let spb = spb::parse(f.body, block_offset, snap_len)?;
                    let packet = Packet {
                        timestamp_seconds: 0,
                        timestamp_subseconds: 0,
                        captured_length: spb.data.len() as u32,
                        original_length: spb.original_len,
                        interface_index: if self.interfaces.is_empty() { -1 } else { 0 },
                        data: spb.data,
                    };
                    self.offset = next;
                    return Ok(Some(packet));
                }
                BLOCK_ISB => {
                    let stats = isb::parse(f.body, block_offset)?;
                    self.interface_stats.push(stats);
                    self.offset = next;
                }
                BLOCK_NRB | BLOCK_DSB | BLOCK_CUSTOM_A | BLOCK_CUSTOM_B => {
                    self.warned.warn_skip(f.block_type);
                    self.offset = next;
                }
                other => {
                    self.warned.warn_skip(other);
                    self.offset = next;
                }
            }
            trace!(offset = self.offset, "advanced to next pcap-ng block");
        }
    }

    pub(crate) fn data_link_type(&self) -> Option<LinkType> {
        self.data_link_type
    }

    pub(crate) fn interfaces(&self) -> &[TraceInterface<'a>] {
        &self.interfaces
    }

    pub(crate) fn section_metadata(&self) -> &SectionMetadata<'a> {
        &self.section
    }

    pub(crate) fn interface_statistics(&self) -> &[InterfaceStatistics] {
        &self.interface_stats
    }

    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }
}
