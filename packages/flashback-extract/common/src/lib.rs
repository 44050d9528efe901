use std::path::{Path, PathBuf};
use std::process::ExitCode;

use error_stack::{Context, Report};
use tracing_subscriber::EnvFilter;

/// Run the main function of a tool and convert the result to an exit code.
///
/// The error report, if any, is printed to stderr
pub fn run<C, F>(f: F) -> ExitCode
where
    C: Context,
    F: FnOnce() -> Result<(), Report<C>>,
{
    match f() {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("error: {report:?}");
            ExitCode::FAILURE
        }
    }
}

/// Install the tracing subscriber that prints diagnostics to stderr.
///
/// `RUST_LOG` is honored unless `verbose` is set, which forces `debug`
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // ignore the error if a subscriber is already set (e.g. in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

/// Resolve the directory where dumped and decoded files are written.
///
/// If not specified, the current directory is used. Otherwise the
/// directory is created if needed and returned as an absolute path
pub fn resolve_output_dir(path: Option<&Path>) -> std::io::Result<PathBuf> {
    let Some(path) = path else {
        return std::env::current_dir();
    };
    std::fs::create_dir_all(path)?;
    dunce::canonicalize(path)
}
