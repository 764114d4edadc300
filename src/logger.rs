//! Logging setup for the qrender binary.
//! Library code logs through the `log` macros; this installs `env_logger` as the backend.

use std::io::Write;

/// Initialises the global logger.
///
/// Warnings are always shown so directive diagnostics reach stderr; `verbose`
/// raises the level to debug.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
}
