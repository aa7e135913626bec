#![forbid(unsafe_code)]

//! Structured metadata extraction from JPEG files.
//!
//! `exifscan` walks the segment structure of a JPEG, finds the APP1 Exif
//! segment, parses the TIFF image-file-directory tree embedded inside it, and
//! hands back typed Exif tags plus frame information and the embedded
//! thumbnail. Sidecar payloads it doesn't interpret (JFIF APP0, Adobe XMP,
//! a bounded snapshot of scan data) come back as raw bytes.
//!
//! ```
//! use exifscan::{ParseOptions, parse_bytes};
//!
//! // the smallest possible JPEG: a start-of-image and an end-of-image
//! let raw = parse_bytes(&[0xFF, 0xD8, 0xFF, 0xD9], &ParseOptions::default()).unwrap();
//! assert!(raw.image_entries.is_empty());
//! assert!(raw.thumbnail.is_empty());
//! ```
//!
//! Parsing is a single pass with no process-wide state: options are a value
//! threaded through the call, and logging goes through the `log` facade to
//! whatever sink the host installed.

use std::{collections::BTreeMap, path::Path};

mod cache;
mod error;
mod exif;
mod jpeg;
mod simple;
mod thumbnail;
mod util;

pub use cache::MetadataCache;
pub use error::MetadataError;
pub use exif::error::{EntryError, ExifFatalError, Warning};
pub use jpeg::error::JpegError;
pub use simple::SimpleMetadata;

// the data model lives in its own crate; re-export the parts callers touch
pub use exifscan_types::{
    exif::{
        Entry, TypeMismatch, Value,
        primitives::{ExifType, Rational, SRational},
        tags,
    },
    frame::{JpegEncoding, StartOfFrame},
};

/// Knobs for a single parse call.
///
/// These are read-only during a parse - there is no global configuration
/// object. Hosts that want defaults build one value at startup and pass it
/// around.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Walk the entropy-coded scan data after SOS instead of stopping there.
    ///
    /// Off by default: most callers only want metadata, and every segment
    /// that matters precedes the scan. Turning this on also captures the
    /// bounded scan snapshot in [`RawMetadata::scan_data`].
    pub parse_image_data: bool,
}

/// Everything one parse extracts from one file.
///
/// All byte sequences are owned copies - the underlying file is closed
/// before a `RawMetadata` reaches the caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMetadata {
    /// Image Exif tags: IFD 0 with its Exif/GPS/Interop sub-IFDs flattened
    /// in.
    pub image_entries: BTreeMap<u16, Entry>,

    /// Thumbnail Exif tags (IFD 1).
    pub thumbnail_entries: BTreeMap<u16, Entry>,

    /// The embedded thumbnail JPEG, sliced out of the thumbnail IFD.
    /// Empty when absent or unextractable.
    pub thumbnail: Vec<u8>,

    /// Set when the thumbnail was extracted without the Compression tag
    /// saying `6` (old-style JPEG) - the bytes may not be a JPEG at all.
    pub thumbnail_heuristic: bool,

    /// Frame parameters from the first SOFn segment.
    pub frame: StartOfFrame,

    /// Raw JFIF APP0 payload, if one appeared.
    pub jfif: Vec<u8>,

    /// Raw Adobe XMP packet (APP1, identifier stripped), if one appeared.
    /// Opaque to this library.
    pub xmp: Vec<u8>,

    /// A bounded snapshot of the entropy-coded scan data, captured only when
    /// [`ParseOptions::parse_image_data`] is on. Capped at 64 KiB.
    pub scan_data: Vec<u8>,

    /// Per-entry soft failures that were dropped during the parse.
    ///
    /// Camera files routinely carry a few malformed entries; partial data
    /// plus a warning beats failing the whole file.
    pub warnings: Vec<Warning>,
}

/// Parses a JPEG held in memory.
pub fn parse_bytes(input: &[u8], options: &ParseOptions) -> Result<RawMetadata, MetadataError> {
    jpeg::parse(input, options)
}

/// Parses the JPEG at `path` with default options.
pub fn parse_raw(path: impl AsRef<Path>) -> Result<RawMetadata, MetadataError> {
    parse_raw_with(path, &ParseOptions::default())
}

/// Parses the JPEG at `path`.
///
/// The file handle lives only for the duration of the read; every byte the
/// result refers to is copied out before this returns.
pub fn parse_raw_with(
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<RawMetadata, MetadataError> {
    let bytes = std::fs::read(path.as_ref()).inspect_err(|e| {
        log::error!(
            "Couldn't read `{}` for metadata extraction. err: {e}",
            path.as_ref().display()
        );
    })?;

    parse_bytes(&bytes, options)
}

/// Parses the file and projects the well-known tags into a flat record.
pub fn get_simple(path: impl AsRef<Path>) -> Result<SimpleMetadata, MetadataError> {
    let path = path.as_ref();
    let raw = parse_raw(path)?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(simple::project(name, &raw))
}

/// Looks up a single image-Exif tag.
///
/// `Ok(None)` means the file parsed but doesn't carry the tag - distinct
/// from a present-but-differently-typed tag, which comes back `Ok(Some(_))`
/// and fails at the accessor.
pub fn try_get_tag(path: impl AsRef<Path>, tag: u16) -> Result<Option<Entry>, MetadataError> {
    let mut raw = parse_raw(path)?;
    Ok(raw.image_entries.remove(&tag))
}

/// All image-Exif tags (sub-IFDs included). Empty on any failure.
pub fn get_tags(path: impl AsRef<Path>) -> BTreeMap<u16, Entry> {
    parse_raw(path).map(|raw| raw.image_entries).unwrap_or_default()
}

/// The embedded thumbnail JPEG. Empty on any failure.
pub fn get_thumbnail(path: impl AsRef<Path>) -> Vec<u8> {
    parse_raw(path).map(|raw| raw.thumbnail).unwrap_or_default()
}
