//! Filter Process Runner
//!
//! Launches the filter under test, collects its output and guarantees the
//! child is gone before `invoke` returns.

use crate::error::HarnessError;
use crate::marshal::marshal_arguments;
use crate::response::FilterResponse;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Maximum number of stderr bytes kept for error reports
const STDERR_TAIL_BYTES: usize = 2048;

/// Handle to a filter executable under test
#[derive(Debug, Clone)]
pub struct FilterProcess {
    /// Path to the filter executable
    executable: PathBuf,
    /// Wall-clock limit for one invocation (None = wait forever)
    timeout: Option<Duration>,
    /// Extra environment variables for the child
    envs: Vec<(OsString, OsString)>,
}

/// Everything the child left behind once it exited
struct Captured {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl FilterProcess {
    /// Create a handle for the given executable, with no timeout
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: None,
            envs: Vec::new(),
        }
    }

    /// Set the invocation time limit
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add an environment variable for the child process
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Get the executable path
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Get the configured time limit
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run the filter once over `vector` and parse what it prints
    ///
    /// The call blocks until the child exits or the time limit expires. The
    /// child is spawned with `kill_on_drop`, and every early return kills and
    /// reaps it explicitly, so no filter process outlives this call.
    pub async fn invoke(
        &self,
        k_factor: f64,
        vector: &[f64],
    ) -> Result<FilterResponse, HarnessError> {
        let args = marshal_arguments(k_factor, vector);
        info!(
            "Invoking filter {} with k_factor {} and {} samples",
            self.executable.display(),
            k_factor,
            vector.len()
        );

        let mut child = Command::new(&self.executable)
            .args(&args)
            .envs(self.envs.iter().map(|(key, value)| (key, value)))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| HarnessError::Launch {
                path: self.executable.clone(),
                source,
            })?;

        let collected = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, collect(&mut child)).await {
                Ok(collected) => collected,
                Err(_) => {
                    warn!("Filter exceeded {:?}, killing it", limit);
                    terminate(&mut child).await;
                    return Err(HarnessError::Timeout { limit });
                }
            },
            None => collect(&mut child).await,
        };

        let captured = match collected {
            Ok(captured) => captured,
            Err(err) => {
                terminate(&mut child).await;
                return Err(err);
            }
        };

        debug!(
            "Filter exited with {}: {} stdout bytes, {} stderr bytes",
            captured.status,
            captured.stdout.len(),
            captured.stderr.len()
        );

        if !captured.status.success() {
            let stderr = stderr_tail(&captured.stderr);
            warn!("Filter failed with {}", captured.status);
            return Err(HarnessError::Execution {
                code: captured.status.code(),
                stderr,
            });
        }

        let response = FilterResponse::parse(&captured.stdout)?;
        debug!("Parsed {} samples from filter output", response.len());
        Ok(response)
    }
}

/// Drain both pipes concurrently, then wait for exit
async fn collect(child: &mut Child) -> Result<Captured, HarnessError> {
    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| std::io::Error::other("filter stdout was not captured"))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| std::io::Error::other("filter stderr was not captured"))?;

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    tokio::try_join!(
        stdout_pipe.read_to_end(&mut stdout),
        stderr_pipe.read_to_end(&mut stderr)
    )?;
    let status = child.wait().await?;

    Ok(Captured {
        status,
        stdout,
        stderr,
    })
}

/// Kill the child if it is still running and reap it
async fn terminate(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        debug!("Filter already exited before kill: {}", e);
    }
    if let Err(e) = child.wait().await {
        warn!("Failed to reap filter process: {}", e);
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let start = stderr.len().saturating_sub(STDERR_TAIL_BYTES);
    String::from_utf8_lossy(&stderr[start..]).trim().to_string()
}
