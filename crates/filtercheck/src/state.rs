//! Run state tracking

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage that can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Generating,
    Invoking,
    Validating,
    Rendering,
}

impl Stage {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Generating => "generating",
            Stage::Invoking => "invoking",
            Stage::Validating => "validating",
            Stage::Rendering => "rendering",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a run in `Idle -> Generating -> Invoking -> Validating -> Rendering -> Done`
///
/// Any stage may fall into `Failed`, which is terminal like `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Idle,
    Active(Stage),
    Done,
    Failed { stage: Stage },
}

impl RunState {
    /// Whether the run has finished, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed { .. })
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => f.write_str("idle"),
            RunState::Active(stage) => write!(f, "{}", stage),
            RunState::Done => f.write_str("done"),
            RunState::Failed { stage } => write!(f, "failed while {}", stage),
        }
    }
}
