//! The flattened "simplified metadata" projection.

use exifscan_types::{
    exif::{
        primitives::Rational,
        tags,
        tags::{ExposureProgram, Orientation},
    },
    frame::JpegEncoding,
};

use crate::RawMetadata;

/// The well-known subset of a file's metadata, flattened into one record.
///
/// Every Exif-derived field is optional - cameras write whichever tags they
/// feel like. Frame fields come from the SOFn segment and default to zero
/// when no frame was seen.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimpleMetadata {
    /// File stem of the source path.
    pub name: String,

    pub width: u16,
    pub height: u16,
    pub bits_per_sample: u8,
    pub color_components: u8,
    pub is_color: bool,
    pub encoding: Option<JpegEncoding>,

    pub software: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub orientation: Option<Orientation>,
    pub iso: Option<u32>,

    /// Exposure time as the camera wrote it, e.g. `1/250`.
    pub exposure_time: Option<Rational>,

    /// F-number derived from the APEX ApertureValue.
    pub aperture: Option<f64>,

    /// F-number derived from the APEX MaxApertureValue.
    pub max_aperture: Option<f64>,

    pub focal_length_35mm: Option<u32>,
    pub exposure_program: Option<ExposureProgram>,
    pub lens_model: Option<String>,
    pub created: Option<String>,
    pub modified: Option<String>,
    pub copyright: Option<String>,
    pub artist: Option<String>,
}

/// Projects the well-known tags out of a raw parse.
pub(crate) fn project(name: String, raw: &RawMetadata) -> SimpleMetadata {
    let text = |tag: u16| {
        raw.image_entries
            .get(&tag)
            .and_then(|e| e.try_string().ok())
            .filter(|s| !s.is_empty())
    };
    let number = |tag: u16| {
        raw.image_entries
            .get(&tag)
            .and_then(|e| e.try_u32().ok())
    };
    let f_number = |tag: u16| {
        raw.image_entries
            .get(&tag)
            .and_then(|e| e.try_rational().ok())
            .and_then(|r| r.to_f64())
            .map(apex_to_f_number)
    };

    SimpleMetadata {
        name,

        width: raw.frame.width,
        height: raw.frame.height,
        bits_per_sample: raw.frame.bits_per_sample,
        color_components: raw.frame.components,
        is_color: raw.frame.is_color,
        encoding: raw.frame.encoding,

        software: text(tags::SOFTWARE),
        make: text(tags::MAKE),
        model: text(tags::MODEL),
        orientation: number(tags::ORIENTATION)
            .and_then(|v| u16::try_from(v).ok())
            .and_then(|v| Orientation::try_from(v).ok()),
        iso: number(tags::ISO),
        exposure_time: raw
            .image_entries
            .get(&tags::EXPOSURE_TIME)
            .and_then(|e| e.try_rational().ok()),
        aperture: f_number(tags::APERTURE_VALUE),
        max_aperture: f_number(tags::MAX_APERTURE_VALUE),
        focal_length_35mm: number(tags::FOCAL_LENGTH_IN_35MM),
        exposure_program: number(tags::EXPOSURE_PROGRAM)
            .and_then(|v| u16::try_from(v).ok())
            .and_then(|v| ExposureProgram::try_from(v).ok()),
        lens_model: text(tags::LENS_MODEL),
        created: text(tags::DATE_TIME_ORIGINAL),
        modified: text(tags::MODIFY_DATE),
        copyright: text(tags::COPYRIGHT),
        artist: text(tags::ARTIST),
    }
}

/// APEX aperture to f-number: `exp(apex × ln 2 / 2)`.
///
/// APEX stores aperture on a log scale; each full stop adds 1.
fn apex_to_f_number(apex: f64) -> f64 {
    (apex * core::f64::consts::LN_2 / 2.0).exp()
}
