//! Build invocation phases.

use std::fmt;

use serde::{Deserialize, Serialize};

use retarget_util::errors::RetargetError;

/// A lifecycle stage of one build invocation.
///
/// Phases are totally ordered: `Declared < GraphReady < Evaluated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Modules are known but none of their configuration has run.
    Declared,
    /// The task graph is complete; compile tasks exist for every module.
    GraphReady,
    /// A module's own configuration has run, including platform extensions.
    Evaluated,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Declared => "declared",
            Self::GraphReady => "graph-ready",
            Self::Evaluated => "evaluated",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enforces the one-directional `declared -> graph-ready -> evaluated` machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTracker {
    current: Phase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self {
            current: Phase::Declared,
        }
    }

    pub fn current(&self) -> Phase {
        self.current
    }

    /// Move to `to`. Staying in the current phase is allowed; going back is not.
    pub fn advance(&mut self, to: Phase) -> miette::Result<()> {
        if to < self.current {
            return Err(RetargetError::Phase {
                message: format!("cannot move from {} back to {}", self.current, to),
            }
            .into());
        }
        if to != self.current {
            tracing::debug!(from = %self.current, to = %to, "phase transition");
        }
        self.current = to;
        Ok(())
    }
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}
