use winnow::{
    Parser,
    binary::{be_u16, u8},
    error::EmptyError,
};

use exifscan_types::frame::{JpegEncoding, StartOfFrame};

use super::error::JpegError;

/// Parses a SOFn segment body into frame parameters.
///
/// The payload layout is fixed: precision (1 byte), then height and width as
/// big-endian `u16`s, then the component count. Per-component data follows,
/// which we don't need.
pub(crate) fn parse_frame(marker: u8, payload: &[u8]) -> Result<StartOfFrame, JpegError> {
    let input: &mut &[u8] = &mut &*payload;

    let short = |_: EmptyError| {
        log::error!("SOF segment body cut off. marker: `{marker:#04x}`");
        JpegError::UnexpectedEnd {
            context: "a start-of-frame segment body",
        }
    };

    let bits_per_sample: u8 = u8.parse_next(input).map_err(short)?;
    let height: u16 = be_u16.parse_next(input).map_err(short)?;
    let width: u16 = be_u16.parse_next(input).map_err(short)?;
    let components: u8 = u8.parse_next(input).map_err(short)?;

    Ok(StartOfFrame {
        bits_per_sample,
        height,
        width,
        components,
        is_color: components == 3,
        encoding: JpegEncoding::from_marker(marker),
    })
}

#[cfg(test)]
mod tests {
    use exifscan_types::frame::JpegEncoding;

    use crate::util::logger;

    #[test]
    fn baseline_color_frame() {
        logger();

        // 8 bits, 64 tall, 96 wide, 3 components
        let payload = [0x08_u8, 0x00, 0x40, 0x00, 0x60, 0x03, 0x01, 0x22, 0x00];
        let frame = super::parse_frame(0xC0, &payload).unwrap();

        assert_eq!(frame.bits_per_sample, 8);
        assert_eq!(frame.height, 64);
        assert_eq!(frame.width, 96);
        assert_eq!(frame.components, 3);
        assert!(frame.is_color);
        assert_eq!(frame.encoding, Some(JpegEncoding::Baseline));
        assert_eq!(frame.encoding.unwrap().name(), "Baseline");
    }

    #[test]
    fn grayscale_progressive() {
        logger();

        let payload = [0x08_u8, 0x04, 0x00, 0x03, 0x00, 0x01];
        let frame = super::parse_frame(0xC2, &payload).unwrap();

        assert_eq!(frame.height, 1024);
        assert_eq!(frame.width, 768);
        assert!(!frame.is_color);
        assert_eq!(frame.encoding, Some(JpegEncoding::Progressive));
    }

    #[test]
    fn short_payload_is_an_error() {
        logger();

        assert!(super::parse_frame(0xC0, &[0x08, 0x00]).is_err());
    }
}
