/// A fatal problem with the JPEG segment structure.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JpegError {
    /// The stream doesn't open with the `FF D8` start-of-image marker.
    NotAJpeg,

    /// A marker was expected, but the `0xFF` preamble byte wasn't there.
    BadMarker {
        /// What we read instead of `0xFF`.
        found: u8,
    },

    /// A segment declared a length too small to contain its own length
    /// field.
    BadLength {
        /// The marker code of the offending segment.
        marker: u8,

        /// The declared length, which must be at least 2.
        declared: u16,
    },

    /// The stream ended before a required field was complete.
    UnexpectedEnd {
        /// What we were in the middle of reading.
        context: &'static str,
    },
}

impl core::fmt::Display for JpegError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            JpegError::NotAJpeg => {
                f.write_str("The stream doesn't start with the JPEG SOI marker.")
            }
            JpegError::BadMarker { found } => {
                write!(
                    f,
                    "Expected a `0xFF` marker preamble, but got `{found:#04x}`."
                )
            }
            JpegError::BadLength { marker, declared } => {
                write!(
                    f,
                    "Segment `{marker:#04x}` declared an impossible length of `{declared}`."
                )
            }
            JpegError::UnexpectedEnd { context } => {
                write!(f, "The stream ended while reading {context}.")
            }
        }
    }
}

impl core::error::Error for JpegError {}
