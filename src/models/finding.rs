use serde::{Deserialize, Serialize};

/// A single vulnerability report streamed back by the scanning backend.
///
/// Findings are immutable once constructed: the aggregator appends them in
/// arrival order and never rewrites or removes one. The same location may
/// legitimately appear under several categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Vulnerability class as reported by the backend (e.g. "SQL Injection").
    pub category: String,
    /// Repository path the finding points at.
    pub location: String,
    pub description: String,
    pub remediation: String,
}
