use winnow::{
    Parser,
    binary::{Endianness as WinnowEndianness, f32, f64, i16, i32, u16, u32},
    error::EmptyError,
};

use exifscan_types::exif::{
    Entry, Value,
    primitives::{ExifType, Rational, SRational},
};

use super::{error::EntryError, ifd::RawEntry};

/// Materializes one raw descriptor into a typed entry.
///
/// Values up to four bytes sit inline in the descriptor's value slot; larger
/// ones sit at an offset from the TIFF base. Either way the scalars decode
/// under the payload's declared byte order, so callers never see wire order.
pub(crate) fn resolve_entry(
    raw: &RawEntry,
    blob: &[u8],
    endianness: WinnowEndianness,
) -> Result<Entry, EntryError> {
    let ty = ExifType::try_from(raw.ty).map_err(|()| EntryError::UnknownType { code: raw.ty })?;

    let size: u32 = raw
        .count
        .checked_mul(u32::from(ty.size_bytes()))
        .ok_or(EntryError::CountOverflow {
            count: raw.count,
            ty,
        })?;

    // the value slot holds the value bytes themselves, left-justified, in
    // wire order - so re-materialize the four bytes as they appeared
    let inline: [u8; 4] = match endianness {
        WinnowEndianness::Big => raw.value_or_offset.to_be_bytes(),
        WinnowEndianness::Little => raw.value_or_offset.to_le_bytes(),
        WinnowEndianness::Native => unreachable!("the walker never uses native order"),
    };

    let data: &[u8] = if size <= 4 {
        &inline[..size as usize]
    } else {
        let start = raw.value_or_offset as usize;
        let out_of_range = EntryError::OutOfRangeOffset {
            offset: raw.value_or_offset,
            size,
        };

        let end = start.checked_add(size as usize).ok_or(out_of_range.clone())?;
        blob.get(start..end).ok_or(out_of_range)?
    };

    let value = decode_value(data, ty, raw.count, endianness)?;

    Ok(Entry {
        tag: raw.tag,
        value,
    })
}

/// Decodes `count` scalars of `ty` out of `data`.
fn decode_value(
    data: &[u8],
    ty: ExifType,
    count: u32,
    endianness: WinnowEndianness,
) -> Result<Value, EntryError> {
    let input: &mut &[u8] = &mut &*data;
    let count = count as usize;

    // `data` was sized upstream, so scalar reads can't actually run dry;
    // the mapping is here so a bug shows up as a warning, not a panic
    let truncated = EntryError::Truncated {
        needed: (count as u32) * u32::from(ty.size_bytes()),
        available: data.len() as u32,
    };

    let value = match ty {
        ExifType::Byte => Value::Byte(data.to_vec()),
        ExifType::Ascii => Value::Ascii(data.to_vec()),
        ExifType::Undefined => Value::Undefined(data.to_vec()),
        ExifType::SByte => Value::SByte(data.iter().map(|&b| b as i8).collect()),

        ExifType::Short => {
            let mut list = Vec::with_capacity(count);
            for _ in 0..count {
                list.push(
                    u16(endianness)
                        .parse_next(input)
                        .map_err(|_: EmptyError| truncated.clone())?,
                );
            }
            Value::Short(list)
        }

        ExifType::Long => {
            let mut list = Vec::with_capacity(count);
            for _ in 0..count {
                list.push(
                    u32(endianness)
                        .parse_next(input)
                        .map_err(|_: EmptyError| truncated.clone())?,
                );
            }
            Value::Long(list)
        }

        ExifType::SShort => {
            let mut list = Vec::with_capacity(count);
            for _ in 0..count {
                list.push(
                    i16(endianness)
                        .parse_next(input)
                        .map_err(|_: EmptyError| truncated.clone())?,
                );
            }
            Value::SShort(list)
        }

        ExifType::SLong => {
            let mut list = Vec::with_capacity(count);
            for _ in 0..count {
                list.push(
                    i32(endianness)
                        .parse_next(input)
                        .map_err(|_: EmptyError| truncated.clone())?,
                );
            }
            Value::SLong(list)
        }

        ExifType::Float => {
            let mut list = Vec::with_capacity(count);
            for _ in 0..count {
                list.push(
                    f32(endianness)
                        .parse_next(input)
                        .map_err(|_: EmptyError| truncated.clone())?,
                );
            }
            Value::Float(list)
        }

        ExifType::Double => {
            let mut list = Vec::with_capacity(count);
            for _ in 0..count {
                list.push(
                    f64(endianness)
                        .parse_next(input)
                        .map_err(|_: EmptyError| truncated.clone())?,
                );
            }
            Value::Double(list)
        }

        ExifType::Rational => {
            let mut list = Vec::with_capacity(count);
            for _ in 0..count {
                let numerator = u32(endianness)
                    .parse_next(input)
                    .map_err(|_: EmptyError| truncated.clone())?;
                let denominator = u32(endianness)
                    .parse_next(input)
                    .map_err(|_: EmptyError| truncated.clone())?;
                list.push(Rational {
                    numerator,
                    denominator,
                });
            }
            Value::Rational(list)
        }

        ExifType::SRational => {
            let mut list = Vec::with_capacity(count);
            for _ in 0..count {
                let numerator = i32(endianness)
                    .parse_next(input)
                    .map_err(|_: EmptyError| truncated.clone())?;
                let denominator = i32(endianness)
                    .parse_next(input)
                    .map_err(|_: EmptyError| truncated.clone())?;
                list.push(SRational {
                    numerator,
                    denominator,
                });
            }
            Value::SRational(list)
        }
    };

    Ok(value)
}
