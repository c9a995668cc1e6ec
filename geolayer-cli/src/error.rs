//! CLI error handling with user-facing messages and process exit codes.
//!
//! Exit codes are part of the tool's contract:
//! 0 success, 1 missing argument, 2 wrong argument or failed
//! computation, 3 raster file access failure.

use geolayer::geotiff::GeotiffError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// A required argument was supplied neither on the command line nor
    /// in the config file.
    MissingArgument(String),
    /// An argument or configuration value is unusable.
    InvalidArgument(String),
    /// Reading or writing a raster file failed.
    FileAccess(GeotiffError),
    /// One or more kernel layers failed to compute.
    ComputeFailed(String),
}

impl CliError {
    /// The process exit code this error maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::MissingArgument(_) => 1,
            CliError::InvalidArgument(_) => 2,
            CliError::FileAccess(_) => 3,
            CliError::ComputeFailed(_) => 2,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::MissingArgument(_) => {
                eprintln!();
                eprintln!("Run with --help for usage, or point --config at an INI file.");
            }
            CliError::FileAccess(GeotiffError::FailOpen { .. }) => {
                eprintln!();
                eprintln!("Check that the path exists and is readable.");
            }
            CliError::FileAccess(GeotiffError::FileInvalid { .. }) => {
                eprintln!();
                eprintln!("The reader expects single-band grayscale TIFF files;");
                eprintln!("the georeference travels in a .tfw world-file sidecar.");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::MissingArgument(what) => write!(f, "missing argument: {}", what),
            CliError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            CliError::FileAccess(e) => write!(f, "raster file access failed: {}", e),
            CliError::ComputeFailed(msg) => write!(f, "computation failed: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::FileAccess(e) => Some(e),
            _ => None,
        }
    }
}
