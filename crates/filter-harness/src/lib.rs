//! Filter Process Harness
//!
//! Runs a filter executable as `<filter> <k_factor> <v_0> ... <v_{n-1}>` and
//! reads back the whitespace-separated samples it prints on stdout.
//!
//! The harness never retries: a launch failure, non-zero exit, malformed
//! output token or expired timeout is returned to the caller as a
//! [`HarnessError`].

mod error;
mod marshal;
mod process;
mod response;

pub use error::HarnessError;
pub use marshal::marshal_arguments;
pub use process::FilterProcess;
pub use response::FilterResponse;
