//! The `.shx` spatial index: record count plus per-record SHP offset/length
//! (spec §4.4). No R-tree semantics are implemented — consumption is purely
//! "the i-th record lives at this SHP byte offset" (spec §1 Non-goals).

use crate::error::{Error, Result};
use crate::header::HEADER_SIZE;
use crate::primitive::read_u32_be;
use crate::ByteSource;

const INDEX_ENTRY_SIZE: u64 = 8;

/// One `.shx` entry: SHP byte offset and content length, both already
/// converted from the on-disk 16-bit-word units into bytes.
#[derive(Debug, Copy, Clone)]
pub struct ShxEntry {
    pub shp_offset: u64,
    pub content_length: u64,
}

/// Provides record count and random-access offset lookup into `.shp`.
pub struct ShxIndex {
    tot_records: u64,
}

impl ShxIndex {
    /// Builds the index from the total byte size of the `.shx` file (spec
    /// §8 property 2: `tot_records = (shx_size - 100) / 8`).
    pub fn from_file_size(shx_size: u64) -> Self {
        let tot_records = shx_size.saturating_sub(HEADER_SIZE) / INDEX_ENTRY_SIZE;
        ShxIndex { tot_records }
    }

    pub fn tot_records(&self) -> u64 {
        self.tot_records
    }

    /// Reads the entry for the 1-based ordinal `i` from `src`, which must
    /// already be positioned past the 100-byte header (any prior seek is
    /// overridden here).
    pub fn entry(&self, src: &mut dyn ByteSource, i: u64) -> Result<ShxEntry> {
        if i == 0 || i > self.tot_records {
            return Err(Error::IndexOutOfRange(i as i64));
        }
        let entry_offset = HEADER_SIZE + INDEX_ENTRY_SIZE * (i - 1);
        src.seek(entry_offset)?;
        let offset_words = read_u32_be(src)?;
        let content_length_words = read_u32_be(src)?;
        Ok(ShxEntry {
            shp_offset: u64::from(offset_words) * 2,
            content_length: u64::from(content_length_words) * 2,
        })
    }
}
