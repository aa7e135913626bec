use crate::{exif::error::ExifFatalError, jpeg::error::JpegError};

/// Any fatal failure from a parse call.
///
/// Segment-level problems abort the whole parse and surface here. Per-entry
/// problems inside a well-formed APP1 never do - those are dropped and
/// collected in [`crate::RawMetadata::warnings`].
#[derive(Debug)]
pub enum MetadataError {
    /// The underlying read failed.
    Io(std::io::Error),

    /// The JPEG segment structure was malformed.
    Jpeg(JpegError),

    /// The APP1 Exif payload was malformed.
    Exif(ExifFatalError),
}

impl From<std::io::Error> for MetadataError {
    fn from(value: std::io::Error) -> Self {
        MetadataError::Io(value)
    }
}

impl From<JpegError> for MetadataError {
    fn from(value: JpegError) -> Self {
        MetadataError::Jpeg(value)
    }
}

impl From<ExifFatalError> for MetadataError {
    fn from(value: ExifFatalError) -> Self {
        MetadataError::Exif(value)
    }
}

impl core::fmt::Display for MetadataError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MetadataError::Io(e) => write!(f, "Couldn't read the file. err: {e}"),
            MetadataError::Jpeg(e) => e.fmt(f),
            MetadataError::Exif(e) => e.fmt(f),
        }
    }
}

impl core::error::Error for MetadataError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            MetadataError::Io(e) => Some(e),
            MetadataError::Jpeg(e) => Some(e),
            MetadataError::Exif(e) => Some(e),
        }
    }
}
