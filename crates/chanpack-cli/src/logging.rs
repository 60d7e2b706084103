//! Log subscriber setup.

/// Maps `-q` / `-v` flags to a log level filter.
///
/// `RUST_LOG`-style directives are not read; the flags are the only control.
pub fn level_filter(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Installs the fmt subscriber, writing to stderr so that stdout stays
/// clean for command output and `--json`.
pub fn init(quiet: bool, verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level_filter(quiet, verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
