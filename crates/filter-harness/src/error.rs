//! Harness Error Types

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while running the filter under test
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Executable missing or not runnable
    #[error("Failed to launch filter {}", path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filter terminated unsuccessfully
    #[error("Filter {}: {stderr}", exit_label(.code))]
    Execution { code: Option<i32>, stderr: String },

    /// Output token that is not a floating-point value
    #[error("Malformed output token {token:?} at position {position}")]
    OutputParse { position: usize, token: String },

    /// Filter still running when the time limit expired
    #[error("Filter did not finish within {limit:?} and was killed")]
    Timeout { limit: Duration },

    /// Pipe or wait failure while the filter was running
    #[error("I/O error while running filter")]
    Io(#[from] std::io::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}
