//! Stand-in filter for exercising the harness (test use only)
//!
//! Invoked as `stub-filter <k_factor> <v_0> ... <v_{n-1}>`. Behavior is picked
//! with `STUB_FILTER_MODE`:
//!
//! - `echo` (default): print the samples back unchanged
//! - `fail`: exit with status 1
//! - `truncate`: drop the last sample
//! - `garbage`: print a non-numeric token
//! - `nan`: replace the first sample with `NaN`
//! - `hang`: sleep for a minute before echoing

use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let samples: Vec<String> = std::env::args().skip(2).collect();
    let mode = std::env::var("STUB_FILTER_MODE").unwrap_or_else(|_| "echo".to_string());

    match mode.as_str() {
        "echo" => println!("{}", samples.join(" ")),
        "fail" => {
            eprintln!("stub-filter: forced failure");
            return ExitCode::from(1);
        }
        "truncate" => {
            let kept = samples.len().saturating_sub(1);
            println!("{}", samples[..kept].join(" "));
        }
        "garbage" => println!("{} not-a-number", samples.join(" ")),
        "nan" => {
            let rest = samples.get(1..).unwrap_or_default();
            println!("NaN {}", rest.join(" "));
        }
        "hang" => {
            std::thread::sleep(Duration::from_secs(60));
            println!("{}", samples.join(" "));
        }
        other => {
            eprintln!("stub-filter: unknown mode {:?}", other);
            return ExitCode::from(2);
        }
    }
    ExitCode::SUCCESS
}
