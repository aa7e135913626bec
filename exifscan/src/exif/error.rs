use exifscan_types::exif::primitives::ExifType;

/// This type describes the outcome of walking an APP1 Exif payload.
///
/// `Err` means the payload's framing was broken and nothing useful came out.
/// `Ok` means the walk finished; individual entries may still have been
/// dropped, in which case each drop is recorded as a [`Warning`].
pub type ExifFatalResult<T> = Result<T, ExifFatalError>;

/// A structural problem with the APP1 Exif payload. Fatal to the parse.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExifFatalError {
    /// The payload doesn't open with `"Exif"` plus two NUL bytes.
    BadExifHeader,

    /// The TIFF byte-order mark wasn't `II` or `MM`.
    BadByteOrder {
        /// The two bytes we found instead.
        found: [u8; 2],
    },

    /// The TIFF magic number wasn't 42.
    BadTiffMagic {
        /// What the magic slot held instead.
        found: u16,
    },

    /// The payload ended before a required field was complete.
    UnexpectedEnd {
        /// What we were in the middle of reading.
        context: &'static str,
    },

    /// An IFD offset points outside the payload.
    OutOfRangeIfd {
        /// The offending offset, relative to the TIFF base.
        offset: u32,
    },
}

/// Why one entry was dropped during a parse.
///
/// These never abort the parse - camera files routinely carry a few
/// malformed entries, and partial data beats no data. Each drop becomes a
/// [`Warning`] on the result.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntryError {
    /// The entry declared a type code outside the twelve known ones.
    UnknownType {
        /// The on-wire type code.
        code: u16,
    },

    /// `count × size-of-type` overflowed. No real file stores 4 GiB of one
    /// entry; this is a malformed or hostile count.
    CountOverflow {
        /// The declared scalar count.
        count: u32,

        /// The declared type.
        ty: ExifType,
    },

    /// The entry's value lies (partly) outside the payload.
    OutOfRangeOffset {
        /// The value offset, relative to the TIFF base.
        offset: u32,

        /// How many bytes the entry claimed to store there.
        size: u32,
    },

    /// The value bytes ran out mid-scalar.
    Truncated {
        /// Bytes the declared type and count require.
        needed: u32,

        /// Bytes actually available.
        available: u32,
    },

    /// IFD recursion hit its depth cap; the branch was dropped. Keeps
    /// cyclic pointer chains from recursing forever.
    CycleOrDepth {
        /// The depth at which the branch was cut.
        depth: u8,
    },

    /// A linked IFD (sub-IFD or thumbnail IFD) failed to parse and its
    /// entries were dropped.
    IfdDropped {
        /// Where the dropped IFD claimed to live, relative to the TIFF
        /// base.
        offset: u32,
    },
}

/// One dropped entry: which tag (when known) and why.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Warning {
    /// The tag of the offending entry, when the failure is tied to one.
    pub tag: Option<u16>,

    /// What went wrong.
    pub error: EntryError,
}

impl core::fmt::Display for ExifFatalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BadExifHeader => {
                f.write_str("APP1 payload doesn't start with the Exif identifier.")
            }
            Self::BadByteOrder { found } => {
                write!(
                    f,
                    "TIFF byte-order mark should be `II` or `MM`, got `{found:x?}`."
                )
            }
            Self::BadTiffMagic { found } => {
                write!(f, "TIFF magic number should be 42, got `{found}`.")
            }
            Self::UnexpectedEnd { context } => {
                write!(f, "The Exif payload ended while reading {context}.")
            }
            Self::OutOfRangeIfd { offset } => {
                write!(f, "IFD offset `{offset}` points outside the payload.")
            }
        }
    }
}

impl core::fmt::Display for EntryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownType { code } => {
                write!(f, "Entry declared unknown type code `{code}`.")
            }
            Self::CountOverflow { count, ty } => {
                write!(f, "Entry count `{count}` of `{ty:?}` overflows.")
            }
            Self::OutOfRangeOffset { offset, size } => {
                write!(
                    f,
                    "Entry value (`{size}` bytes at offset `{offset}`) lies outside the payload."
                )
            }
            Self::Truncated { needed, available } => {
                write!(
                    f,
                    "Entry value needs `{needed}` bytes but only `{available}` are present."
                )
            }
            Self::CycleOrDepth { depth } => {
                write!(f, "IFD recursion cut off at depth `{depth}`.")
            }
            Self::IfdDropped { offset } => {
                write!(f, "Linked IFD at offset `{offset}` was dropped.")
            }
        }
    }
}

impl core::fmt::Display for Warning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.tag {
            Some(tag) => write!(f, "tag {tag:#06x}: {}", self.error),
            None => self.error.fmt(f),
        }
    }
}

impl core::error::Error for ExifFatalError {}
impl core::error::Error for EntryError {}
