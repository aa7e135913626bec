//! Typed Exif values.
//!
//! Exif is a structured binary format: each IFD entry names a tag ID, a
//! physical type, and a count of stored primitives. We decode that into
//! [`Entry`] - a tag plus a [`Value`] carrying count-many scalars.
//!
//! Holding decoded scalars (rather than raw bytes plus a type code) makes
//! "wrong type" a structural impossibility: accessors are pattern matches,
//! and byte order is gone by the time a value reaches the caller.

use crate::exif::primitives::{ExifType, Rational, SRational};

pub mod primitives;
pub mod tags;

/// One decoded IFD entry: a tag and its value.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub struct Entry {
    /// The on-wire tag ID.
    pub tag: u16,

    /// The decoded value(s).
    pub value: Value,
}

/// The value of an IFD entry.
///
/// Each variant carries count-many decoded scalars for one of the twelve
/// physical types.
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub enum Value {
    Byte(Vec<u8>),
    Ascii(Vec<u8>),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<Rational>),
    SByte(Vec<i8>),
    Undefined(Vec<u8>),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<SRational>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl Value {
    /// Which physical type is stored inside.
    pub fn ty(&self) -> ExifType {
        match self {
            Value::Byte(_) => ExifType::Byte,
            Value::Ascii(_) => ExifType::Ascii,
            Value::Short(_) => ExifType::Short,
            Value::Long(_) => ExifType::Long,
            Value::Rational(_) => ExifType::Rational,
            Value::SByte(_) => ExifType::SByte,
            Value::Undefined(_) => ExifType::Undefined,
            Value::SShort(_) => ExifType::SShort,
            Value::SLong(_) => ExifType::SLong,
            Value::SRational(_) => ExifType::SRational,
            Value::Float(_) => ExifType::Float,
            Value::Double(_) => ExifType::Double,
        }
    }

    /// How many scalars are stored.
    pub fn count(&self) -> usize {
        match self {
            Value::Byte(v) | Value::Ascii(v) | Value::Undefined(v) => v.len(),
            Value::Short(v) => v.len(),
            Value::Long(v) => v.len(),
            Value::Rational(v) => v.len(),
            Value::SByte(v) => v.len(),
            Value::SShort(v) => v.len(),
            Value::SLong(v) => v.len(),
            Value::SRational(v) => v.len(),
            Value::Float(v) => v.len(),
            Value::Double(v) => v.len(),
        }
    }
}

/// An accessor asked a [`Value`] for a scalar it doesn't hold.
///
/// Only the `try_*` accessors surface this; the `as_*` family returns a
/// type-appropriate zero/empty sentinel instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeMismatch {
    /// What the caller asked for, e.g. `"u32"`.
    pub requested: &'static str,

    /// The physical type actually stored.
    pub found: ExifType,
}

impl core::fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Entry holds `{:?}` data, which can't be read as `{}`.",
            self.found, self.requested
        )
    }
}

impl core::error::Error for TypeMismatch {}

impl Entry {
    /// Which physical type this entry stores.
    pub fn ty(&self) -> ExifType {
        self.value.ty()
    }

    /// How many scalars this entry stores.
    pub fn count(&self) -> usize {
        self.value.count()
    }

    /// First scalar widened to `u32`.
    ///
    /// Accepts `Byte`, `Short`, and `Long` - values like ISO are written
    /// with any of those depending on the camera, so we decode through the
    /// declared type rather than assuming `Short`.
    pub fn try_u32(&self) -> Result<u32, TypeMismatch> {
        let mismatch = TypeMismatch {
            requested: "u32",
            found: self.ty(),
        };

        match self.value {
            Value::Byte(ref v) => v.first().copied().map(u32::from).ok_or(mismatch),
            Value::Short(ref v) => v.first().copied().map(u32::from).ok_or(mismatch),
            Value::Long(ref v) => v.first().copied().ok_or(mismatch),
            _ => Err(mismatch),
        }
    }

    /// First scalar widened to `i32`. Accepts the signed integer types plus
    /// `Byte` and `Short`, which always fit.
    pub fn try_i32(&self) -> Result<i32, TypeMismatch> {
        let mismatch = TypeMismatch {
            requested: "i32",
            found: self.ty(),
        };

        match self.value {
            Value::Byte(ref v) => v.first().copied().map(i32::from).ok_or(mismatch),
            Value::Short(ref v) => v.first().copied().map(i32::from).ok_or(mismatch),
            Value::SByte(ref v) => v.first().copied().map(i32::from).ok_or(mismatch),
            Value::SShort(ref v) => v.first().copied().map(i32::from).ok_or(mismatch),
            Value::SLong(ref v) => v.first().copied().ok_or(mismatch),
            _ => Err(mismatch),
        }
    }

    /// First scalar as `f64`.
    ///
    /// Any numeric type qualifies. Rationals go through their `to_f64`, so a
    /// zero-denominator sentinel is reported as a mismatch rather than
    /// divided by.
    pub fn try_f64(&self) -> Result<f64, TypeMismatch> {
        let mismatch = TypeMismatch {
            requested: "f64",
            found: self.ty(),
        };

        match self.value {
            Value::Byte(ref v) => v.first().map(|&n| f64::from(n)).ok_or(mismatch),
            Value::Short(ref v) => v.first().map(|&n| f64::from(n)).ok_or(mismatch),
            Value::Long(ref v) => v.first().map(|&n| f64::from(n)).ok_or(mismatch),
            Value::SByte(ref v) => v.first().map(|&n| f64::from(n)).ok_or(mismatch),
            Value::SShort(ref v) => v.first().map(|&n| f64::from(n)).ok_or(mismatch),
            Value::SLong(ref v) => v.first().map(|&n| f64::from(n)).ok_or(mismatch),
            Value::Float(ref v) => v.first().map(|&n| f64::from(n)).ok_or(mismatch),
            Value::Double(ref v) => v.first().copied().ok_or(mismatch),
            Value::Rational(ref v) => v.first().and_then(Rational::to_f64).ok_or(mismatch),
            Value::SRational(ref v) => v.first().and_then(SRational::to_f64).ok_or(mismatch),
            _ => Err(mismatch),
        }
    }

    /// The `Ascii` payload as a string, trimmed at its NUL terminator.
    ///
    /// Camera firmware is sloppy about encodings, so decoding is lossy.
    pub fn try_string(&self) -> Result<String, TypeMismatch> {
        match self.value {
            Value::Ascii(ref v) => {
                let end = v.iter().position(|&b| b == 0).unwrap_or(v.len());
                Ok(String::from_utf8_lossy(&v[..end]).into_owned())
            }
            _ => Err(TypeMismatch {
                requested: "string",
                found: self.ty(),
            }),
        }
    }

    /// First unsigned rational.
    pub fn try_rational(&self) -> Result<Rational, TypeMismatch> {
        let mismatch = TypeMismatch {
            requested: "rational",
            found: self.ty(),
        };

        match self.value {
            Value::Rational(ref v) => v.first().copied().ok_or(mismatch),
            _ => Err(mismatch),
        }
    }

    /// First signed rational.
    pub fn try_srational(&self) -> Result<SRational, TypeMismatch> {
        let mismatch = TypeMismatch {
            requested: "srational",
            found: self.ty(),
        };

        match self.value {
            Value::SRational(ref v) => v.first().copied().ok_or(mismatch),
            _ => Err(mismatch),
        }
    }

    /// Raw bytes of a `Byte`, `Ascii`, or `Undefined` entry.
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match self.value {
            Value::Byte(ref v) | Value::Ascii(ref v) | Value::Undefined(ref v) => Some(v),
            _ => None,
        }
    }

    /// Like [`Entry::try_u32`], with `0` on mismatch.
    pub fn as_u32(&self) -> u32 {
        self.try_u32().unwrap_or(0)
    }

    /// Like [`Entry::try_i32`], with `0` on mismatch.
    pub fn as_i32(&self) -> i32 {
        self.try_i32().unwrap_or(0)
    }

    /// Like [`Entry::try_f64`], with `0.0` on mismatch.
    pub fn as_f64(&self) -> f64 {
        self.try_f64().unwrap_or(0.0)
    }

    /// Like [`Entry::try_string`], with `""` on mismatch.
    pub fn as_string(&self) -> String {
        self.try_string().unwrap_or_default()
    }

    /// Like [`Entry::try_rational`], with the `0/0` sentinel on mismatch.
    pub fn as_rational(&self) -> Rational {
        self.try_rational().unwrap_or_default()
    }

    /// Like [`Entry::try_srational`], with the `0/0` sentinel on mismatch.
    pub fn as_srational(&self) -> SRational {
        self.try_srational().unwrap_or_default()
    }
}
