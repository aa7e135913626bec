//! Best-effort extraction of the embedded thumbnail JPEG.

use std::collections::BTreeMap;

use exifscan_types::exif::{Entry, tags};

/// The Compression value meaning "old-style JPEG" - what a thumbnail IFD
/// should declare.
const COMPRESSION_OLD_JPEG: u32 = 6;

/// Slices the embedded thumbnail out of the blob, using the thumbnail IFD's
/// offset and length tags.
///
/// Best effort: a missing tag or a bad slice leaves the thumbnail empty
/// instead of failing the parse. The second return value flags a heuristic
/// extraction - one where the Compression tag didn't confirm old-style JPEG,
/// so the bytes may not be a JPEG at all.
pub(crate) fn extract(entries: &BTreeMap<u16, Entry>, blob: &[u8]) -> (Vec<u8>, bool) {
    let offset = entries
        .get(&tags::THUMBNAIL_OFFSET)
        .and_then(|e| e.try_u32().ok());
    let length = entries
        .get(&tags::THUMBNAIL_LENGTH)
        .and_then(|e| e.try_u32().ok());

    // both tags or no thumbnail
    let (Some(offset), Some(length)) = (offset, length) else {
        return (Vec::new(), false);
    };

    let start = offset as usize;
    let Some(end) = start.checked_add(length as usize) else {
        log::warn!("Thumbnail length overflows. Skipping extraction.");
        return (Vec::new(), false);
    };

    let Some(bytes) = blob.get(start..end) else {
        log::warn!(
            "Thumbnail slice (`{length}` bytes at offset `{offset}`) lies outside the \
            payload. Skipping extraction."
        );
        return (Vec::new(), false);
    };

    let confirmed = entries
        .get(&tags::COMPRESSION)
        .and_then(|e| e.try_u32().ok())
        == Some(COMPRESSION_OLD_JPEG);
    if !confirmed {
        log::warn!("Extracting a thumbnail without Compression confirming old-style JPEG.");
    }

    (bytes.to_vec(), !confirmed)
}
