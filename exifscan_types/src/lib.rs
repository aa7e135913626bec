#![forbid(unsafe_code)]

//! Data model for the `exifscan` metadata extractor.
//!
//! Everything in here is plain data - no I/O, no parsing. The `exifscan`
//! crate fills these types in while walking a JPEG file.

pub mod exif;
pub mod frame;
