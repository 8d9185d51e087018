use std::io;
use std::result;

/// The result type returned by every fallible operation in this crate.
pub type Result<T> = result::Result<T, Error>;

/// Everything that can go wrong while opening or reading a trace file.
///
/// Errors fall into two rough classes: ones that abort the whole trace
/// (a bad magic number, a truncated header, an unsupported byte order) and
/// ones that abort only the current call to [`Cursor::next_packet`][crate::Cursor::next_packet]
/// while leaving the cursor in a state where `close` is still valid. See
/// the per-variant docs for which is which.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no such file: {0}")]
    NotFound(std::path::PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("file is too short to contain a {format} header (need {needed} bytes, found {found})")]
    TooShort {
        format: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("didn't recognise the magic number {0:#010x}")]
    UnknownFormat(u32),

    #[error("unsupported byte order magic {0:#010x}; only native little-endian sections are supported")]
    UnsupportedByteOrder(u32),

    #[error("truncated record: expected at least {expected} more bytes at offset {offset}, but only {available} remain")]
    Truncated {
        offset: u64,
        expected: usize,
        available: usize,
    },

    #[error("malformed block at offset {offset}: {reason}")]
    MalformedBlock { offset: u64, reason: String },

    #[error("malformed option at offset {offset}: {reason}")]
    MalformedOption { offset: u64, reason: String },

    #[error("file does not look like a zstd frame")]
    NotZstd,

    #[error("zstd frame does not record its decompressed size")]
    UnknownDecompressedSize,

    #[error("decompressed {actual} bytes but the frame header declared {expected}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("zstd decompression failed: {0}")]
    DecompressError(#[source] io::Error),

    #[error("interface index {index} out of range (trace has {len} interfaces)")]
    OutOfRange { index: u32, len: usize },

    #[error("illegal cursor operation: {0}")]
    IllegalState(&'static str),
}
