//! The TIFF walker for APP1 Exif payloads.
//!
//! Exif embeds a TIFF structure: a byte-order mark, the magic number 42, and
//! a chain of IFDs (image file directories). Every offset in the structure
//! is relative to the TIFF header - the "TIFF base" - not the file, so the
//! original payload slice rides along in parser state.
//!
//! JPEG-Exif uses at most two IFDs: IFD 0 for the image (with the Exif, GPS,
//! and interoperability sub-IFDs hanging off pointer tags) and IFD 1 for the
//! thumbnail.

use std::collections::BTreeMap;

use winnow::{
    Parser, Stateful,
    binary::{Endianness as WinnowEndianness, u16, u32},
    error::EmptyError,
    token::take,
};

use exifscan_types::exif::Entry;

use self::{
    error::{EntryError, ExifFatalError, ExifFatalResult, Warning},
    ifd::{RawEntry, parse_ifd},
    value::resolve_entry,
};
use crate::thumbnail;

pub mod error;
mod ifd;
mod value;

/// The full Exif identifier: `"Exif"` plus two NUL bytes.
const EXIF_SIG: &[u8] = b"Exif\0\0";

/// Everything extracted from one APP1 Exif payload.
pub(crate) struct ParsedExif {
    pub(crate) image_entries: BTreeMap<u16, Entry>,
    pub(crate) thumbnail_entries: BTreeMap<u16, Entry>,
    pub(crate) thumbnail: Vec<u8>,
    pub(crate) thumbnail_heuristic: bool,
    pub(crate) warnings: Vec<Warning>,
}

// all parsers past the byte-order mark need the declared endianness plus the
// original blob (offsets address the blob, not the cursor), so both live in
// a stateful stream

#[derive(Debug)]
pub(crate) struct State<'a> {
    pub(crate) endianness: WinnowEndianness,
    pub(crate) blob: &'a [u8],
}

/// The payload slice wrapped with parser state.
pub(crate) type Stream<'s> = Stateful<&'s [u8], State<'s>>;

/// Walks one APP1 Exif payload, `"Exif\0\0"` identifier included.
pub(crate) fn parse_app1(payload: &[u8]) -> ExifFatalResult<ParsedExif> {
    let input: &mut &[u8] = &mut &*payload;

    // identifier first
    let sig: &[u8] = take(EXIF_SIG.len())
        .parse_next(input)
        .map_err(|_: EmptyError| {
            log::error!("APP1 payload too short for the Exif identifier.");
            ExifFatalError::BadExifHeader
        })?;
    if sig != EXIF_SIG {
        log::error!("APP1 payload carries a broken Exif identifier.");
        return Err(ExifFatalError::BadExifHeader);
    }

    // this position is the TIFF base
    let blob: &[u8] = *input;

    let endianness = parse_byte_order(input)?;

    let stream = &mut Stream {
        input: *input,
        state: State { endianness, blob },
    };

    parse_tiff_magic(stream)?;

    let first_ifd_offset: u32 =
        u32(endianness)
            .parse_next(stream)
            .map_err(|_: EmptyError| {
                log::error!("No first-IFD offset after the TIFF magic number.");
                ExifFatalError::UnexpectedEnd {
                    context: "the first IFD offset",
                }
            })?;

    let mut warnings: Vec<Warning> = Vec::new();

    // IFD 0 plus its pointered sub-IFDs, flattened into one list
    let mut image_raw: Vec<RawEntry> = Vec::new();
    let thumbnail_ifd_offset =
        parse_ifd(stream, first_ifd_offset, 0, &mut image_raw, &mut warnings)?;

    // IFD 0's next-pointer names the thumbnail IFD; links past it are
    // ignored. A broken thumbnail IFD only costs us the thumbnail.
    let mut thumbnail_raw: Vec<RawEntry> = Vec::new();
    if thumbnail_ifd_offset != 0
        && let Err(e) = parse_ifd(
            stream,
            thumbnail_ifd_offset,
            0,
            &mut thumbnail_raw,
            &mut warnings,
        )
    {
        log::warn!("Thumbnail IFD failed to parse; dropping it. err: {e}");
        thumbnail_raw.clear();
        warnings.push(Warning {
            tag: None,
            error: EntryError::IfdDropped {
                offset: thumbnail_ifd_offset,
            },
        });
    }

    let image_entries = resolve_all(&image_raw, blob, endianness, &mut warnings);
    let thumbnail_entries = resolve_all(&thumbnail_raw, blob, endianness, &mut warnings);

    let (thumbnail, thumbnail_heuristic) = thumbnail::extract(&thumbnail_entries, blob);

    Ok(ParsedExif {
        image_entries,
        thumbnail_entries,
        thumbnail,
        thumbnail_heuristic,
        warnings,
    })
}

/// Finds the byte order declared in the TIFF header.
fn parse_byte_order(input: &mut &[u8]) -> ExifFatalResult<WinnowEndianness> {
    let bom: &[u8] = take(2_usize).parse_next(input).map_err(|_: EmptyError| {
        log::error!("No byte-order mark in the TIFF header.");
        ExifFatalError::UnexpectedEnd {
            context: "the TIFF byte-order mark",
        }
    })?;

    match bom {
        [b'I', b'I'] => {
            log::trace!("Intel (little-endian) alignment.");
            Ok(WinnowEndianness::Little)
        }
        [b'M', b'M'] => {
            log::trace!("Motorola (big-endian) alignment.");
            Ok(WinnowEndianness::Big)
        }
        _ => {
            let found = [bom[0], bom[1]];
            log::error!("Weird byte-order mark: `{found:x?}`");
            Err(ExifFatalError::BadByteOrder { found })
        }
    }
}

/// Checks the TIFF magic number, 42 in the declared order.
fn parse_tiff_magic(input: &mut Stream) -> ExifFatalResult<()> {
    let endianness = input.state.endianness;

    let magic: u16 = u16(endianness).parse_next(input).map_err(|_: EmptyError| {
        log::error!("No TIFF magic number after the byte-order mark.");
        ExifFatalError::UnexpectedEnd {
            context: "the TIFF magic number",
        }
    })?;

    if magic != 42 {
        log::error!("TIFF magic number was `{magic}`, not 42.");
        return Err(ExifFatalError::BadTiffMagic { found: magic });
    }

    Ok(())
}

/// Resolves raw descriptors into typed entries keyed by tag.
///
/// Resolution failures drop the entry into the warning list. Duplicate tags
/// in one list resolve deterministically: the last occurrence wins.
fn resolve_all(
    raw: &[RawEntry],
    blob: &[u8],
    endianness: WinnowEndianness,
    warnings: &mut Vec<Warning>,
) -> BTreeMap<u16, Entry> {
    let mut entries = BTreeMap::new();

    for descriptor in raw {
        match resolve_entry(descriptor, blob, endianness) {
            Ok(entry) => {
                entries.insert(entry.tag, entry);
            }
            Err(error) => {
                log::warn!(
                    "Dropping entry for tag `{:#06x}`. err: {error}",
                    descriptor.tag
                );
                warnings.push(Warning {
                    tag: Some(descriptor.tag),
                    error,
                });
            }
        }
    }

    entries
}
