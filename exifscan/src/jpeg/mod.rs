//! The JPEG segment scanner.
//!
//! JPEG is a sequence of marker segments, most with a declared length, a few
//! without. The scanner is the outer control loop of a parse: it dispatches
//! each segment it recognizes (SOFn, APP0, APP1, SOS) and skips the rest.

pub mod error;
mod frame;
mod parse;

pub(crate) use parse::parse;
