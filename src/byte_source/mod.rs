//! Read-only byte ranges backing a trace.
//!
//! Two flavours: a memory-mapped file ([`mapped`]) for plain pcap and
//! pcap-ng, and a heap buffer holding a single decompressed zstd frame
//! ([`zstd_frame`]) for `.zst`/`.zstd`-wrapped pcap-ng. Both expose the same
//! minimal surface — a byte slice and the filepath it came from — so the
//! decoders above don't need to know which one they're reading from.

mod mapped;
mod zstd_frame;

pub(crate) use mapped::MappedSource;
pub(crate) use zstd_frame::ZstdFrameSource;

use std::path::Path;

/// A contiguous, read-only view of a trace file's bytes.
///
/// Implementors own whatever resource (mapping, buffer) backs the slice and
/// release it on drop.
pub(crate) trait ByteSource {
    fn bytes(&self) -> &[u8];
    fn filepath(&self) -> &Path;
}
