//! Blocks this crate traverses but doesn't decode: Name Resolution,
//! Decryption Secrets, Custom, and anything with an unrecognised block
//! type. Each is skipped by its declared length, with a warning logged
//! once per block type per trace rather than once per block, so a file
//! with thousands of these doesn't flood the diagnostic sink.

use std::cell::RefCell;
use std::collections::HashSet;
use tracing::warn;

pub(crate) const NAME_RESOLUTION: u32 = 0x0000_0004;
pub(crate) const DECRYPTION_SECRETS: u32 = 0x0000_000A;
pub(crate) const CUSTOM_COPYABLE: u32 = 0x0000_0BAD;
pub(crate) const CUSTOM_NON_COPYABLE: u32 = 0x4000_0BAD;

fn label(block_type: u32) -> String {
    match block_type {
        NAME_RESOLUTION => "Name Resolution Block".to_string(),
        DECRYPTION_SECRETS => "Decryption Secrets Block".to_string(),
        CUSTOM_COPYABLE | CUSTOM_NON_COPYABLE => "Custom Block".to_string(),
        other => format!("block type {other:#010x}"),
    }
}

/// Tracks which block types a [`crate::Cursor`] has already warned about,
/// so repeats of the same opaque block type stay silent.
#[derive(Default)]
pub(crate) struct WarnedOnce(RefCell<HashSet<u32>>);

impl WarnedOnce {
    pub(crate) fn warn_skip(&self, block_type: u32) {
        if self.0.borrow_mut().insert(block_type) {
            warn!("skipping unhandled {}", label(block_type));
        }
    }
}
