//! The physical value types Exif can store.

/// An enumeration of the twelve physical types an IFD entry may carry.
///
/// The discriminants are the on-wire type codes from TIFF 6.0 / Exif.
#[repr(u16)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum ExifType {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,
}

impl ExifType {
    /// Grabs the type's size in bytes.
    ///
    /// ```
    /// use exifscan_types::exif::primitives::ExifType;
    ///
    /// assert_eq!(ExifType::SRational.size_bytes(), 8_u8);
    /// ```
    pub const fn size_bytes(&self) -> u8 {
        match self {
            ExifType::Byte | ExifType::Ascii | ExifType::SByte | ExifType::Undefined => 1_u8,
            ExifType::Short | ExifType::SShort => 2_u8,
            ExifType::Long | ExifType::SLong | ExifType::Float => 4_u8,
            ExifType::Rational | ExifType::SRational | ExifType::Double => 8_u8,
        }
    }
}

impl TryFrom<u16> for ExifType {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Byte),
            2 => Ok(Self::Ascii),
            3 => Ok(Self::Short),
            4 => Ok(Self::Long),
            5 => Ok(Self::Rational),
            6 => Ok(Self::SByte),
            7 => Ok(Self::Undefined),
            8 => Ok(Self::SShort),
            9 => Ok(Self::SLong),
            10 => Ok(Self::SRational),
            11 => Ok(Self::Float),
            12 => Ok(Self::Double),

            _ => Err(()),
        }
    }
}

/// A fraction that can't be negative.
///
/// A zero denominator is representable - cameras write `0/0` as a "no value"
/// sentinel - so the conversion methods hand back `None` instead of dividing.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    /// The fraction as a float, unless the denominator is zero.
    pub fn to_f64(&self) -> Option<f64> {
        (self.denominator != 0).then(|| f64::from(self.numerator) / f64::from(self.denominator))
    }

    /// The truncated integer quotient, unless the denominator is zero.
    pub fn to_u32(&self) -> Option<u32> {
        (self.denominator != 0).then(|| self.numerator / self.denominator)
    }
}

/// A signed fraction.
///
/// Same zero-denominator contract as [`Rational`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct SRational {
    pub numerator: i32,
    pub denominator: i32,
}

impl SRational {
    /// The fraction as a float, unless the denominator is zero.
    pub fn to_f64(&self) -> Option<f64> {
        (self.denominator != 0).then(|| f64::from(self.numerator) / f64::from(self.denominator))
    }

    /// The truncated integer quotient, unless the denominator is zero.
    pub fn to_i32(&self) -> Option<i32> {
        (self.denominator != 0).then(|| self.numerator.wrapping_div(self.denominator))
    }
}
