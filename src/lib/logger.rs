use log::LevelFilter;

/// Initialize the logger on stderr so table output on stdout stays clean
///
/// # Arguments
///
/// * `verbose` - Enable debug level logging
/// * `quiet` - Only log errors
///
/// `RUST_LOG` takes precedence over both flags when set.
pub fn init_logger(verbose: bool, quiet: bool) {
    let log_level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp_secs()
        .init();
}
