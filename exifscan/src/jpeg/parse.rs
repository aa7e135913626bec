use winnow::{
    Parser,
    binary::{be_u16, u8},
    error::EmptyError,
    token::take,
};

use exifscan_types::frame::JpegEncoding;

use crate::{ParseOptions, RawMetadata, error::MetadataError, exif};

use super::{error::JpegError, frame::parse_frame};

/// The first byte of every marker.
const MARKER_PREAMBLE: u8 = 0xFF;

/// Start of image.
const SOI_MARKER_CODE: u8 = 0xD8;

/// End of image.
const EOI_MARKER_CODE: u8 = 0xD9;

/// Start of scan. Entropy-coded data follows, with no declared length.
const SOS_MARKER_CODE: u8 = 0xDA;

/// Define restart interval. Its presence legalizes restart markers inside
/// scan data.
const DRI_MARKER_CODE: u8 = 0xDD;

/// APP0, where JFIF lives.
const APP0_MARKER_CODE: u8 = 0xE0;

/// APP1, where Exif and XMP live.
const APP1_MARKER_CODE: u8 = 0xE1;

/// Leading bytes of an APP1 Exif payload. The full identifier adds two NUL
/// bytes, which the TIFF walker checks.
const EXIF_SIG_PREFIX: &[u8] = b"Exif";

/// Identifier of an APP0 JFIF payload.
const JFIF_SIG: &[u8] = b"JFIF\0";

/// Identifier of an APP1 Adobe XMP payload.
const XMP_SIG: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";

/// Cap on the preserved scan-data snapshot.
const SCAN_SNAPSHOT_MAX: usize = 64 * 1024;

/// Attempts to parse a JPEG file.
pub(crate) fn parse(input: &[u8], options: &ParseOptions) -> Result<RawMetadata, MetadataError> {
    let input: &mut &[u8] = &mut &*input;

    // the stream must open with `SOI`
    let soi: &[u8] = take(2_usize).parse_next(input).map_err(|_: EmptyError| {
        log::error!("Too short to even hold an SOI marker. Not a JPEG.");
        JpegError::NotAJpeg
    })?;
    if soi != [MARKER_PREAMBLE, SOI_MARKER_CODE] {
        log::error!("The first two bytes weren't `FF D8`. Not a JPEG.");
        return Err(JpegError::NotAJpeg.into());
    }

    let mut meta = RawMetadata::default();
    let mut restart_markers_allowed = false;
    let mut exif_seen = false;

    // walk segments until EOI, SOS (when not walking image data), or the end
    // of the stream
    while !input.is_empty() {
        let preamble: u8 = u8.parse_next(input).map_err(|_: EmptyError| {
            JpegError::UnexpectedEnd {
                context: "a marker preamble",
            }
        })?;
        if preamble != MARKER_PREAMBLE {
            log::error!("Expected a marker preamble, got `{preamble:#04x}`.");
            return Err(JpegError::BadMarker { found: preamble }.into());
        }

        // any number of extra `FF` padding bytes may precede the code
        let code: u8 = loop {
            let b: u8 = u8.parse_next(input).map_err(|_: EmptyError| {
                log::error!("Stream ended on a dangling `FF` preamble.");
                JpegError::UnexpectedEnd {
                    context: "a marker code",
                }
            })?;

            if b != MARKER_PREAMBLE {
                break b;
            }
        };

        match code {
            // a stuffed byte (`FF 00`) outside of scan data; ignore it
            0x00 => {
                log::trace!("Stuffed byte outside scan data. Ignoring.");
            }

            EOI_MARKER_CODE => {
                log::trace!("EOI detected! Stopping loop.");
                break;
            }

            SOS_MARKER_CODE => {
                if !options.parse_image_data {
                    log::trace!("Hit SOS with image-data walking off. Stopping loop.");
                    break;
                }

                let scan: &[u8] = walk_scan(input, restart_markers_allowed);
                log::trace!("Walked `{}` bytes of scan data.", scan.len());
                meta.scan_data = scan[..scan.len().min(SCAN_SNAPSHOT_MAX)].to_vec();
            }

            DRI_MARKER_CODE => {
                log::trace!("DRI segment: restart markers are now legal in scan data.");
                restart_markers_allowed = true;
                _ = segment_body(input, code)?;
            }

            // standalone markers carry no length field
            0x01 | 0xD0..=0xD7 | SOI_MARKER_CODE => {
                log::trace!("Skipping standalone marker `{code:#04x}`.");
            }

            _ if JpegEncoding::from_marker(code).is_some() => {
                let body = segment_body(input, code)?;

                // the first frame segment wins; hierarchical files may carry
                // more, which only refine the first
                if meta.frame.encoding.is_none() {
                    meta.frame = parse_frame(code, body)?;
                } else {
                    log::warn!("Found a second SOF segment. Keeping the first.");
                }
            }

            APP0_MARKER_CODE => {
                let body = segment_body(input, code)?;
                if body.starts_with(JFIF_SIG) {
                    log::trace!("Found a JFIF payload. Keeping it verbatim.");
                    meta.jfif = body.to_vec();
                }
            }

            APP1_MARKER_CODE => {
                let body = segment_body(input, code)?;

                if body.starts_with(EXIF_SIG_PREFIX) {
                    if exif_seen {
                        log::warn!("Found more than one Exif payload. Keeping the first.");
                    } else {
                        exif_seen = true;

                        let parsed = exif::parse_app1(body)?;
                        meta.image_entries = parsed.image_entries;
                        meta.thumbnail_entries = parsed.thumbnail_entries;
                        meta.thumbnail = parsed.thumbnail;
                        meta.thumbnail_heuristic = parsed.thumbnail_heuristic;
                        meta.warnings.extend(parsed.warnings);
                    }
                } else if body.starts_with(b"http") {
                    log::trace!("Found an XMP payload. Keeping it opaque.");
                    meta.xmp = body.strip_prefix(XMP_SIG).unwrap_or(body).to_vec();
                } else if body.is_empty() {
                    // an empty APP1 can't even say what it is
                    log::error!("APP1 segment with an empty body.");
                    return Err(exif::error::ExifFatalError::BadExifHeader.into());
                } else {
                    log::trace!("Skipping unrecognized APP1 payload.");
                }
            }

            _ => {
                log::trace!("Skipping segment `{code:#04x}`.");
                _ = segment_body(input, code)?;
            }
        }
    }

    Ok(meta)
}

/// Reads one declared-length segment and returns its body.
///
/// The declared length includes the two length bytes themselves, so the body
/// is `declared - 2` bytes, and the cursor lands exactly on the byte after
/// it.
fn segment_body<'i>(input: &mut &'i [u8], code: u8) -> Result<&'i [u8], JpegError> {
    let declared: u16 = be_u16.parse_next(input).map_err(|_: EmptyError| {
        log::error!("Segment `{code:#04x}` cut off before its length field.");
        JpegError::UnexpectedEnd {
            context: "a segment length",
        }
    })?;

    let len: u16 = declared
        .checked_sub(2_u16)
        .ok_or(JpegError::BadLength {
            marker: code,
            declared,
        })?;

    take(len as usize).parse_next(input).map_err(|_: EmptyError| {
        log::error!(
            "Segment `{code:#04x}` declared `{len}` body bytes, but the stream ran out."
        );
        JpegError::UnexpectedEnd {
            context: "a segment body",
        }
    })
}

/// Walks entropy-coded scan data up to the next real marker.
///
/// A real marker is `FF XX` where `XX` is neither `0x00` (byte stuffing)
/// nor, once a DRI segment has appeared, a restart marker. The cursor is
/// left on the marker's `FF`. Fewer than two remaining bytes means the scan
/// runs to the end of the stream, and the walker consumes it all.
///
/// Returns the scan bytes it walked over.
fn walk_scan<'i>(input: &mut &'i [u8], restart_markers_allowed: bool) -> &'i [u8] {
    let start: &'i [u8] = *input;

    loop {
        let Ok((_, pair)) = take::<_, _, EmptyError>(2_usize).parse_peek(*input) else {
            let _: Result<&[u8], EmptyError> = take(input.len()).parse_next(input);
            break;
        };

        let still_scan_data = pair[0] != MARKER_PREAMBLE
            || pair[1] == 0x00
            || (restart_markers_allowed && (0xD0..=0xD7).contains(&pair[1]));

        if !still_scan_data {
            break;
        }

        let _: Result<u8, EmptyError> = u8.parse_next(input);
    }

    &start[..start.len() - input.len()]
}
