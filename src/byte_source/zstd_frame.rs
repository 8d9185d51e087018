use super::{ByteSource, MappedSource};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A single zstd frame, decompressed into a heap buffer up front.
///
/// Map the compressed file, ask the frame header for its declared
/// decompressed size (refusing frames that don't carry one — streaming,
/// size-unknown decompression isn't supported), allocate a buffer of
/// exactly that size, decompress into it in one call, and verify the size
/// that came out matches the size that was promised.
pub(crate) struct ZstdFrameSource {
    buf: Vec<u8>,
    filepath: PathBuf,
}

impl ZstdFrameSource {
    pub(crate) fn open(filepath: &Path) -> Result<ZstdFrameSource> {
        let has_zst_suffix = filepath
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("zst") || ext.eq_ignore_ascii_case("zstd"))
            .unwrap_or(false);
        if !has_zst_suffix {
            debug!(
                "{} doesn't end in .zst or .zstd; trying to decompress it anyway",
                filepath.display()
            );
        }

        let compressed = MappedSource::open(filepath)?;
        let compressed_bytes = compressed.bytes();

        let declared_size = zstd_safe::get_frame_content_size(compressed_bytes)
            .map_err(|_| Error::NotZstd)?
            .ok_or(Error::UnknownDecompressedSize)?;

        let mut buf = vec![0u8; declared_size as usize];
        let written = zstd::bulk::decompress_to_buffer(compressed_bytes, &mut buf)
            .map_err(Error::DecompressError)?;
        if written as u64 != declared_size {
            return Err(Error::SizeMismatch {
                expected: declared_size,
                actual: written as u64,
            });
        }

        Ok(ZstdFrameSource {
            buf,
            filepath: filepath.to_path_buf(),
        })
    }
}

impl ByteSource for ZstdFrameSource {
    fn bytes(&self) -> &[u8] {
        &self.buf
    }

    fn filepath(&self) -> &Path {
        &self.filepath
    }
}
