use serde::{Deserialize, Serialize};

/// Result of a discovery run over one portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryOutcome {
    /// Holdings whose ticker was resolved and persisted this run.
    pub updated: usize,
    /// Holdings that were missing a ticker when the run started.
    pub total: usize,
}
