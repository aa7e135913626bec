//! Shared helpers for the integration suites.
//!
//! Each suite binary compiles this module independently and uses a subset.
#![allow(dead_code)]

use std::path::PathBuf;

/// Initializes `env_logger` for a test. Fine to call more than once.
pub fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}

/// Wraps a TIFF blob (starting at its byte-order mark) in a complete JPEG:
/// SOI, one APP1 Exif segment, EOI.
pub fn jpeg_with_exif(tiff: &[u8]) -> Vec<u8> {
    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(tiff);

    let mut file = vec![0xFF, 0xD8, 0xFF, 0xE1];
    file.extend_from_slice((payload.len() as u16 + 2).to_be_bytes().as_slice());
    file.extend_from_slice(&payload);
    file.extend_from_slice(&[0xFF, 0xD9]);
    file
}

/// Writes `bytes` to a unique temp file and returns its path.
///
/// `name` must be unique per call site; the process id keeps concurrent test
/// runs apart.
pub fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("exifscan-test-{}-{name}.jpg", std::process::id()));
    std::fs::write(&path, bytes).expect("temp dir should be writable");
    path
}
