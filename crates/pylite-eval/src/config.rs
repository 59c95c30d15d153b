//! Evaluation limits.

use serde::{Deserialize, Serialize};

/// Nesting bound matching the host language's default recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Per-run limits.
///
/// `max_depth` bounds how deeply node evaluation may nest before the run
/// fails with `StackExhausted`. `gas_limit` caps the number of nodes visited;
/// `None` means unbounded, so a `While` whose test never turns false runs
/// forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    pub max_depth: usize,
    pub gas_limit: Option<u64>,
}

impl EvalConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            gas_limit: None,
        }
    }
}
