use super::ByteSource;
use crate::error::{Error, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A whole file, memory-mapped read-only.
///
/// Map the file once in `open`, hand out borrowed slices of it for the
/// lifetime of the mapping, and unmap on `close`/drop. `Mmap::map` exposes
/// exactly `file.metadata()?.len()` bytes — no separate page-rounding
/// arithmetic is needed to get the mapped length right.
pub(crate) struct MappedSource {
    mmap: Mmap,
    filepath: PathBuf,
}

impl MappedSource {
    pub(crate) fn open(filepath: &Path) -> Result<MappedSource> {
        let file = File::open(filepath).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(filepath.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        // SAFETY: the mapping is read-only and this process does not rely on
        // the file being left unmodified by other processes for soundness,
        // only for the contents it sees to stay consistent within a call.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(MappedSource {
            mmap,
            filepath: filepath.to_path_buf(),
        })
    }
}

impl ByteSource for MappedSource {
    fn bytes(&self) -> &[u8] {
        &self.mmap
    }

    fn filepath(&self) -> &Path {
        &self.filepath
    }
}
