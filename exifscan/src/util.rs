//! Small shared test helpers.

/// Initializes `env_logger` for a test. Fine to call more than once.
#[cfg(test)]
pub(crate) fn logger() {
    _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::max())
        .format_file(true)
        .format_line_number(true)
        .try_init();
}
