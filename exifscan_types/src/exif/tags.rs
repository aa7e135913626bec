//! Well-known tag IDs and the enums some of them decode into.
//!
//! This is nowhere near a full Exif parse table - it covers the tags the
//! library itself acts on: the simplified-metadata projection, the IFD
//! pointer tags, and the thumbnail slicing tags. Everything else still parses
//! fine; it just shows up under its numeric tag.

/// Declares tag ID constants alongside a shared `name` lookup.
macro_rules! well_known_tags {
    ( $(
        $(#[$attr:meta])*
        $ident:ident = $id:literal => $name:expr,
    )+ ) => {
        $(
            $(#[$attr])*
            pub const $ident: u16 = $id;
        )+

        /// A human-readable name for a well-known tag, if we have one.
        pub const fn name(tag: u16) -> Option<&'static str> {
            match tag {
                $( $id => Some($name), )+
                _ => None,
            }
        }
    };
}

well_known_tags!(
    /// Thumbnail compression scheme. `6` means old-style JPEG.
    COMPRESSION = 0x0103 => "Compression",
    MAKE = 0x010F => "Make",
    MODEL = 0x0110 => "Model",
    ORIENTATION = 0x0112 => "Orientation",
    SOFTWARE = 0x0131 => "Software",
    MODIFY_DATE = 0x0132 => "ModifyDate",
    ARTIST = 0x013B => "Artist",
    /// Offset of the embedded thumbnail JPEG, relative to the TIFF base.
    THUMBNAIL_OFFSET = 0x0201 => "ThumbnailOffset",
    /// Byte length of the embedded thumbnail JPEG.
    THUMBNAIL_LENGTH = 0x0202 => "ThumbnailLength",
    COPYRIGHT = 0x8298 => "Copyright",
    EXPOSURE_TIME = 0x829A => "ExposureTime",
    /// Pointer to the Exif Sub-IFD.
    EXIF_IFD_POINTER = 0x8769 => "ExifOffset",
    EXPOSURE_PROGRAM = 0x8822 => "ExposureProgram",
    /// Pointer to the GPS IFD.
    GPS_IFD_POINTER = 0x8825 => "GpsOffset",
    ISO = 0x8827 => "ISO",
    DATE_TIME_ORIGINAL = 0x9003 => "DateTimeOriginal",
    APERTURE_VALUE = 0x9202 => "ApertureValue",
    MAX_APERTURE_VALUE = 0x9205 => "MaxApertureValue",
    /// Pointer to the interoperability IFD.
    INTEROP_IFD_POINTER = 0xA005 => "InteropOffset",
    FOCAL_LENGTH_IN_35MM = 0xA405 => "FocalLengthIn35mmFormat",
    LENS_MODEL = 0xA434 => "LensModel",
);

/// Image orientation, from tag `0x0112`.
///
/// The discriminants are the on-wire values. Rotations are clockwise.
#[repr(u16)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum Orientation {
    Horizontal = 1,
    MirrorHorizontal = 2,
    Rotate180 = 3,
    MirrorVertical = 4,
    MirrorHorizontalRotate270 = 5,
    Rotate90 = 6,
    MirrorHorizontalRotate90 = 7,
    Rotate270 = 8,
}

impl TryFrom<u16> for Orientation {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Horizontal),
            2 => Ok(Self::MirrorHorizontal),
            3 => Ok(Self::Rotate180),
            4 => Ok(Self::MirrorVertical),
            5 => Ok(Self::MirrorHorizontalRotate270),
            6 => Ok(Self::Rotate90),
            7 => Ok(Self::MirrorHorizontalRotate90),
            8 => Ok(Self::Rotate270),

            _ => Err(()),
        }
    }
}

/// The camera's exposure program, from tag `0x8822`.
#[repr(u16)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum ExposureProgram {
    NotDefined = 0,
    Manual = 1,
    Normal = 2,
    AperturePriority = 3,
    ShutterPriority = 4,
    Creative = 5,
    Action = 6,
    Portrait = 7,
    Landscape = 8,
}

impl TryFrom<u16> for ExposureProgram {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NotDefined),
            1 => Ok(Self::Manual),
            2 => Ok(Self::Normal),
            3 => Ok(Self::AperturePriority),
            4 => Ok(Self::ShutterPriority),
            5 => Ok(Self::Creative),
            6 => Ok(Self::Action),
            7 => Ok(Self::Portrait),
            8 => Ok(Self::Landscape),

            _ => Err(()),
        }
    }
}
