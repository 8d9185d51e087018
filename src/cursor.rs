//! The trace cursor: a uniform `open`/`next_packet`/`close` state machine
//! over a pcap, pcap-ng, or zstd-wrapped pcap-ng file, picking the right
//! decoder once at open time and then presenting the same interface
//! regardless of which one is underneath.
//!
//! ## Zero-copy self-reference
//!
//! [`Packet::data`] and the string fields of [`TraceInterface`] borrow
//! directly from the mapped file or decompressed buffer this cursor owns.
//! Safely expressing "the cursor owns the buffer *and* hands out borrows
//! into it across repeated calls" needs a small amount of `unsafe`: the
//! underlying bytes are addressed through a [`Box<dyn ByteSource>`], whose
//! heap-or-mmap-backed contents don't move even if the `Cursor` itself is
//! moved, so the per-format readers are constructed against a lifetime
//! extended to `'static` and then handed back out through public API
//! signatures whose lifetimes are tied to `&self`/`&mut self`. The borrow
//! checker then enforces that no borrowed [`Packet`] or [`TraceInterface`]
//! can outlive the `Cursor`, exactly as if the reference were genuinely
//! scoped.

use crate::byte_source::{ByteSource, MappedSource, ZstdFrameSource};
use crate::error::{Error, Result};
use crate::format::{self, Format};
use crate::interface::{InterfaceStatistics, TraceInterface};
use crate::link_type::LinkType;
use crate::packet::Packet;
use crate::pcap;
use crate::pcapng::{self, SectionMetadata};
use std::path::Path;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum State {
    Open,
    Exhausted,
    Closed,
}

enum FormatReader {
    Pcap(pcap::Reader<'static>),
    PcapNg(pcapng::Reader<'static>),
}

/// A uniform, lazy cursor over packet records in a pcap, pcap-ng, or
/// zstd-wrapped pcap-ng trace file.
///
/// Obtained from [`open_reader`]. Single-threaded and `!Sync`-in-spirit:
/// nothing here prevents sending one to another thread, but a `Cursor` must
/// not be shared between threads concurrently.
pub struct Cursor {
    // `None` once `close()` has run. Dropping this is what actually
    // releases the mapping or decompressed buffer; `reader` must be
    // cleared in the same call, since its borrows point into this.
    _source: Option<Box<dyn ByteSource>>,
    file_size: u64,
    reader: Option<FormatReader>,
    state: State,
    // The last values `reader` reported before `close()` took it, so
    // queries made after closing still return something sensible instead
    // of silently going stale or requiring every getter to return `Option`.
    last_offset: u64,
    last_data_link_type: Option<LinkType>,
}

impl Cursor {
    fn open_pcap(source: Box<dyn ByteSource>, timestamp_format: pcap::TimestampFormat) -> Result<Cursor> {
        let bytes: &'static [u8] = unsafe { extend(source.bytes()) };
        let file_size = bytes.len() as u64;
        let reader = pcap::Reader::new(bytes, timestamp_format)?;
        let last_data_link_type = Some(reader.data_link_type());
        Ok(Cursor {
            _source: Some(source),
            file_size,
            reader: Some(FormatReader::Pcap(reader)),
            state: State::Open,
            last_offset: 0,
            last_data_link_type,
        })
    }

    fn open_pcapng(source: Box<dyn ByteSource>) -> Result<Cursor> {
        let bytes: &'static [u8] = unsafe { extend(source.bytes()) };
        let file_size = bytes.len() as u64;
        let reader = pcapng::Reader::new(bytes, 0)?;
        Ok(Cursor {
            _source: Some(source),
            file_size,
            reader: Some(FormatReader::PcapNg(reader)),
            state: State::Open,
            last_offset: 0,
            last_data_link_type: None,
        })
    }

    /// Advance to the next packet.
    ///
    /// Returns `Ok(None)` once the trace is exhausted; further calls
    /// continue to return `Ok(None)` without side effects. Fails
    /// `IllegalState` if the cursor is already closed.
    pub fn next_packet(&mut self) -> Result<Option<Packet<'_>>> {
        match self.state {
            State::Closed => return Err(Error::IllegalState("next_packet called after close")),
            State::Exhausted => return Ok(None),
            State::Open => {}
        }
        let reader = self.reader.as_mut().expect("reader is Some while state != Closed");
        let next = match reader {
            FormatReader::Pcap(r) => r.next_packet(),
            FormatReader::PcapNg(r) => r.next_packet(),
        }?;
        if next.is_none() {
            self.state = State::Exhausted;
        }
        Ok(next)
    }

    /// Whether the trace has no more packets to yield.
    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    /// Total size in bytes of the underlying byte source (the mapped file,
    /// or the decompressed buffer for a zstd-wrapped trace).
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Current byte offset into the byte source. Once `close()` has run,
    /// returns the offset as of the last call before closing.
    pub fn current_offset(&self) -> u64 {
        match &self.reader {
            Some(FormatReader::Pcap(r)) => r.offset(),
            Some(FormatReader::PcapNg(r)) => r.offset(),
            None => self.last_offset,
        }
    }

    /// The data-link type of the trace's first (or only) interface.
    ///
    /// For pcap, this is always available once the cursor is open. For
    /// pcap-ng it is `None` until the first Interface Description Block of
    /// the section has been traversed, which may require one or more
    /// `next_packet` calls if the file interleaves metadata blocks before
    /// the first one. Once `close()` has run, returns the last value
    /// observed before closing.
    pub fn data_link_type(&self) -> Option<LinkType> {
        match &self.reader {
            Some(FormatReader::Pcap(r)) => Some(r.data_link_type()),
            Some(FormatReader::PcapNg(r)) => r.data_link_type(),
            None => self.last_data_link_type,
        }
    }

    /// Interfaces described so far, in file order. Always empty for pcap,
    /// which has exactly one implicit, undescribed interface
    /// (`Packet::interface_index == -1`), and empty once `close()` has run,
    /// since the descriptors borrow from the now-released byte source.
    pub fn trace_interfaces(&self) -> &[TraceInterface<'_>] {
        match &self.reader {
            Some(FormatReader::Pcap(_)) | None => &[],
            Some(FormatReader::PcapNg(r)) => r.interfaces(),
        }
    }

    /// Look up one interface by index. Fails `OutOfRange` if `index` is
    /// outside `0..trace_interfaces().len()`.
    pub fn trace_interface(&self, index: usize) -> Result<&TraceInterface<'_>> {
        self.trace_interfaces()
            .get(index)
            .ok_or(Error::OutOfRange {
                index: index as u32,
                len: self.trace_interfaces().len(),
            })
    }

    /// Section-level annotations decoded from the most recently traversed
    /// Section Header Block. `None` for pcap (which has no sections) and
    /// once `close()` has run.
    pub fn section_metadata(&self) -> Option<&SectionMetadata<'_>> {
        match &self.reader {
            Some(FormatReader::Pcap(_)) | None => None,
            Some(FormatReader::PcapNg(r)) => Some(r.section_metadata()),
        }
    }

    /// Interface Statistics Blocks seen so far, in file order. Always empty
    /// for pcap, and once `close()` has run.
    pub fn interface_statistics(&self) -> &[InterfaceStatistics] {
        match &self.reader {
            Some(FormatReader::Pcap(_)) | None => &[],
            Some(FormatReader::PcapNg(r)) => r.interface_statistics(),
        }
    }

    /// Release the underlying mapping or decompressed buffer. Idempotent:
    /// a second call is a no-op, since the byte source and reader are
    /// already gone and there is nothing left to drop.
    pub fn close(&mut self) {
        if self.reader.is_some() {
            self.last_offset = self.current_offset();
            self.last_data_link_type = self.data_link_type();
        }
        self.reader = None;
        self._source = None;
        self.state = State::Closed;
    }
}

/// Opens `filepath`, probes its format, and returns a cursor positioned
/// just past the header (pcap) or ready to read its first block
/// (pcap-ng/zstd).
pub fn open_reader(filepath: impl AsRef<Path>) -> Result<Cursor> {
    let filepath = filepath.as_ref();
    let probe_source = MappedSource::open(filepath)?;
    let format = format::probe(probe_source.bytes())?;
    match format {
        Format::PcapMicros => Cursor::open_pcap(Box::new(probe_source), pcap::TimestampFormat::Microseconds),
        Format::PcapNanos => Cursor::open_pcap(Box::new(probe_source), pcap::TimestampFormat::Nanoseconds),
        Format::PcapNg => Cursor::open_pcapng(Box::new(probe_source)),
        Format::Zstd => {
            drop(probe_source);
            let source = ZstdFrameSource::open(filepath)?;
            Cursor::open_pcapng(Box::new(source))
        }
    }
}

/// # Safety
///
/// The caller must ensure `bytes` is backed by memory that will remain
/// valid and unmoved for as long as the returned reference is used — here,
/// the lifetime of the `Box<dyn ByteSource>` retained alongside it in
/// [`Cursor`].
unsafe fn extend<'a>(bytes: &'a [u8]) -> &'static [u8] {
    std::mem::transmute::<&'a [u8], &'static [u8]>(bytes)
}
