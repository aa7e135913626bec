//! Frame information from a JPEG start-of-frame segment.

/// Basic image parameters pulled from the first SOFn segment.
///
/// A file with no frame segment (legal, if odd) leaves this at its default:
/// all-zero dimensions and no encoding.
#[derive(Clone, Debug, Default, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct StartOfFrame {
    /// Sample precision, in bits. Almost always `8`.
    pub bits_per_sample: u8,

    /// Frame height in pixels.
    pub height: u16,

    /// Frame width in pixels.
    pub width: u16,

    /// Number of image components. `3` for YCbCr color, `1` for grayscale.
    pub components: u8,

    /// Whether the frame is color, i.e. has three components.
    pub is_color: bool,

    /// Which of the thirteen JPEG encoding variants the frame uses.
    pub encoding: Option<JpegEncoding>,
}

/// The JPEG encoding variant, derived from which SOFn marker appeared.
///
/// The low nibble of the marker byte selects the variant; `0xC4`, `0xC8`,
/// and `0xCC` are not frame markers, which leaves thirteen.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum JpegEncoding {
    Baseline = 0xC0,
    ExtendedSequential = 0xC1,
    Progressive = 0xC2,
    Lossless = 0xC3,
    DifferentialSequential = 0xC5,
    DifferentialProgressive = 0xC6,
    DifferentialLossless = 0xC7,
    ExtendedSequentialArithmetic = 0xC9,
    ProgressiveArithmetic = 0xCA,
    LosslessArithmetic = 0xCB,
    DifferentialSequentialArithmetic = 0xCD,
    DifferentialProgressiveArithmetic = 0xCE,
    DifferentialLosslessArithmetic = 0xCF,
}

impl JpegEncoding {
    /// Maps a SOFn marker byte to its encoding, or `None` for any other
    /// marker byte.
    pub const fn from_marker(marker: u8) -> Option<Self> {
        match marker {
            0xC0 => Some(Self::Baseline),
            0xC1 => Some(Self::ExtendedSequential),
            0xC2 => Some(Self::Progressive),
            0xC3 => Some(Self::Lossless),
            0xC5 => Some(Self::DifferentialSequential),
            0xC6 => Some(Self::DifferentialProgressive),
            0xC7 => Some(Self::DifferentialLossless),
            0xC9 => Some(Self::ExtendedSequentialArithmetic),
            0xCA => Some(Self::ProgressiveArithmetic),
            0xCB => Some(Self::LosslessArithmetic),
            0xCD => Some(Self::DifferentialSequentialArithmetic),
            0xCE => Some(Self::DifferentialProgressiveArithmetic),
            0xCF => Some(Self::DifferentialLosslessArithmetic),

            _ => None,
        }
    }

    /// A human-readable name for the encoding.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Baseline => "Baseline",
            Self::ExtendedSequential => "Extended sequential",
            Self::Progressive => "Progressive",
            Self::Lossless => "Lossless",
            Self::DifferentialSequential => "Differential sequential",
            Self::DifferentialProgressive => "Differential progressive",
            Self::DifferentialLossless => "Differential lossless",
            Self::ExtendedSequentialArithmetic => "Extended sequential, arithmetic coding",
            Self::ProgressiveArithmetic => "Progressive, arithmetic coding",
            Self::LosslessArithmetic => "Lossless, arithmetic coding",
            Self::DifferentialSequentialArithmetic => "Differential sequential, arithmetic coding",
            Self::DifferentialProgressiveArithmetic => {
                "Differential progressive, arithmetic coding"
            }
            Self::DifferentialLosslessArithmetic => "Differential lossless, arithmetic coding",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::JpegEncoding;

    /// All thirteen SOFn markers map, and the three non-frame `0xCn` codes
    /// don't.
    #[test]
    fn marker_table() {
        let frame_markers = [
            0xC0_u8, 0xC1, 0xC2, 0xC3, 0xC5, 0xC6, 0xC7, 0xC9, 0xCA, 0xCB, 0xCD, 0xCE, 0xCF,
        ];
        for m in frame_markers {
            let enc = JpegEncoding::from_marker(m).expect("frame marker should map");
            assert_eq!(enc as u8, m);
            assert!(!enc.name().is_empty());
        }

        assert_eq!(JpegEncoding::from_marker(0xC4), None); // DHT
        assert_eq!(JpegEncoding::from_marker(0xC8), None); // JPG
        assert_eq!(JpegEncoding::from_marker(0xCC), None); // DAC
        assert_eq!(JpegEncoding::from_marker(0xD8), None);
    }

    #[test]
    fn baseline_name() {
        assert_eq!(JpegEncoding::Baseline.name(), "Baseline");
    }
}
