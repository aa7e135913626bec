use winnow::{
    Parser,
    binary::{u16, u32},
    error::EmptyError,
};

use exifscan_types::exif::tags;

use super::{
    Stream,
    error::{EntryError, ExifFatalError, ExifFatalResult, Warning},
};

/// Cap on pointered-IFD recursion. Real files nest two levels at most;
/// cyclic pointer chains nest forever.
const MAX_IFD_DEPTH: u8 = 4;

/// One undecoded IFD entry, exactly as it sits on the wire.
///
/// These only live until the resolver materializes them into typed entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RawEntry {
    pub(crate) tag: u16,
    pub(crate) ty: u16,
    pub(crate) count: u32,
    pub(crate) value_or_offset: u32,
}

/// Parses the IFD at `offset`, appending its entries (and those of any
/// sub-IFD it points to) onto `entries`.
///
/// Returns the offset of the next IFD in the chain; zero means the chain
/// ends here.
pub(crate) fn parse_ifd(
    stream: &mut Stream,
    offset: u32,
    depth: u8,
    entries: &mut Vec<RawEntry>,
    warnings: &mut Vec<Warning>,
) -> ExifFatalResult<u32> {
    let endianness = stream.state.endianness;
    let blob = stream.state.blob;

    // seek: IFD offsets address the blob, not the cursor
    stream.input = blob
        .get(offset as usize..)
        .ok_or(ExifFatalError::OutOfRangeIfd { offset })?;

    let entry_count: u16 = u16(endianness).parse_next(stream).map_err(|_: EmptyError| {
        log::error!("IFD at offset `{offset}` cut off before its entry count.");
        ExifFatalError::UnexpectedEnd {
            context: "an IFD entry count",
        }
    })?;
    log::trace!("IFD at offset `{offset}`: `{entry_count}` entries.");

    for _ in 0..entry_count {
        let raw = parse_raw_entry(stream)?;
        entries.push(raw);

        // pointer tags name a nested IFD whose entries belong to the image;
        // recurse and flatten into the same list
        if matches!(
            raw.tag,
            tags::EXIF_IFD_POINTER | tags::GPS_IFD_POINTER | tags::INTEROP_IFD_POINTER
        ) {
            if depth + 1 >= MAX_IFD_DEPTH {
                log::warn!(
                    "IFD recursion too deep under tag `{:#06x}`. Dropping the branch.",
                    raw.tag
                );
                warnings.push(Warning {
                    tag: Some(raw.tag),
                    error: EntryError::CycleOrDepth { depth: depth + 1 },
                });
                continue;
            }

            let saved = stream.input;
            if let Err(e) = parse_ifd(stream, raw.value_or_offset, depth + 1, entries, warnings) {
                log::warn!(
                    "Sub-IFD under tag `{:#06x}` failed to parse. Dropping it. err: {e}",
                    raw.tag
                );
                warnings.push(Warning {
                    tag: Some(raw.tag),
                    error: EntryError::IfdDropped {
                        offset: raw.value_or_offset,
                    },
                });
            }
            stream.input = saved;
        }
    }

    u32(endianness).parse_next(stream).map_err(|_: EmptyError| {
        log::error!("IFD at offset `{offset}` cut off before its next-IFD pointer.");
        ExifFatalError::UnexpectedEnd {
            context: "a next-IFD pointer",
        }
    })
}

/// Reads one 12-byte entry descriptor.
fn parse_raw_entry(stream: &mut Stream) -> ExifFatalResult<RawEntry> {
    let endianness = stream.state.endianness;

    let cut_off = |_: EmptyError| {
        log::error!("IFD entry descriptor cut off.");
        ExifFatalError::UnexpectedEnd {
            context: "an IFD entry descriptor",
        }
    };

    let tag: u16 = u16(endianness).parse_next(stream).map_err(cut_off)?;
    let ty: u16 = u16(endianness).parse_next(stream).map_err(cut_off)?;
    let count: u32 = u32(endianness).parse_next(stream).map_err(cut_off)?;
    let value_or_offset: u32 = u32(endianness).parse_next(stream).map_err(cut_off)?;

    Ok(RawEntry {
        tag,
        ty,
        count,
        value_or_offset,
    })
}
