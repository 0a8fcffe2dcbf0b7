//! The incremental event aggregator.
//!
//! One [`ScanSession`] owns the whole render-ready state of a submitted
//! scan: phase, progress, findings, and the file tree. The UI layer holds a
//! single instance, feeds it classified events, and reads snapshots; there
//! is no ambient or global state. The session is synchronous: events are
//! applied one at a time through `&mut self`.

pub mod findings;
pub mod progress;
pub mod submit;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::VigilError;
use crate::events::{InboundEvent, ScanRequest};
use crate::models::{build_tree, Finding, PathNode};

use findings::FindingsStore;
use progress::ProgressTracker;

/// Coarse lifecycle of a session: Idle → Submitted → Running →
/// {Completed, Failed}. Terminal phases only transition back through a
/// fresh submission, which forces a full reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Submitted,
    Running,
    Completed,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Submitted => write!(f, "submitted"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Consolidated view of the session for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub label: Option<String>,
    pub phase: Phase,
    pub processed_units: u64,
    pub total_units: Option<u64>,
    pub percentage: u8,
    /// Engaged from submission until the first signal arrives or the
    /// session terminates.
    pub loading: bool,
    /// Whether a new submission would currently be accepted.
    pub accepting_submissions: bool,
    pub error: Option<String>,
    pub findings: Vec<Finding>,
    pub tree: Vec<PathNode>,
    pub started_at: Option<DateTime<Utc>>,
}

/// Stateful consumer of the backend event stream for one scan at a time.
pub struct ScanSession {
    session_id: String,
    expected_host: String,
    label: Option<String>,
    phase: Phase,
    progress: ProgressTracker,
    findings: FindingsStore,
    tree: Vec<PathNode>,
    loading: bool,
    error: Option<String>,
    started_at: Option<DateTime<Utc>>,
    disposed: bool,
}

impl ScanSession {
    pub fn new(expected_host: impl Into<String>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            expected_host: expected_host.into(),
            label: None,
            phase: Phase::Idle,
            progress: ProgressTracker::new(),
            findings: FindingsStore::new(),
            tree: Vec::new(),
            loading: false,
            error: None,
            started_at: None,
            disposed: false,
        }
    }

    /// Validate a repository reference and arm the session for a new scan.
    ///
    /// Rejection leaves every piece of state untouched, including the
    /// loading flag. Acceptance resets the aggregator through Idle, derives
    /// the display label, engages loading, and returns the request payload
    /// to send over the live connection.
    pub fn submit(&mut self, raw_url: &str) -> Result<ScanRequest, VigilError> {
        if self.disposed {
            return Err(VigilError::Internal("session is disposed".to_string()));
        }
        submit::validate_repository_url(raw_url, &self.expected_host)?;

        self.reset();
        self.session_id = uuid::Uuid::new_v4().to_string();
        self.label = Some(submit::display_label(raw_url));
        self.phase = Phase::Submitted;
        self.loading = true;
        self.started_at = Some(Utc::now());

        Ok(ScanRequest { url: raw_url.to_string() })
    }

    /// Apply one classified inbound event.
    ///
    /// Terminal phases are sticky: stragglers after completion or failure
    /// still accumulate (counting and storing stay loss-free) but never
    /// regress the phase. Only a fresh submission leaves a terminal phase.
    pub fn handle_event(&mut self, event: InboundEvent) {
        if self.disposed {
            return;
        }
        match event {
            InboundEvent::TotalUnits(total) => {
                self.progress.record_total(total);
                if self.phase != Phase::Idle && !self.phase.is_terminal() {
                    self.phase = Phase::Running;
                }
            }
            InboundEvent::UnitProcessed(finding) => {
                // Counting and storing are atomic with respect to one
                // event: a finding is never counted without being kept.
                self.progress.record_unit_processed();
                self.findings.append(finding);
                self.loading = false;
                if !self.phase.is_terminal() {
                    self.phase = Phase::Running;
                }
            }
            InboundEvent::Completed => {
                if !self.phase.is_terminal() {
                    self.phase = Phase::Completed;
                }
                self.loading = false;
            }
            InboundEvent::Error(message) => {
                self.fail(message);
            }
            InboundEvent::FileList(paths) => {
                // The list is authoritative; the tree is rebuilt wholesale,
                // never merged across announcements.
                self.tree = build_tree(&paths);
            }
        }
    }

    /// Move the session to Failed with a human-readable message, keeping
    /// findings already received. Shared by backend ErrorEvents and
    /// transport-level connection loss.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.disposed || self.phase.is_terminal() {
            return;
        }
        self.phase = Phase::Failed;
        self.loading = false;
        self.error = Some(message.into());
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            label: self.label.clone(),
            phase: self.phase,
            processed_units: self.progress.processed(),
            total_units: self.progress.total(),
            percentage: self.progress.percentage(),
            loading: self.loading,
            accepting_submissions: self.accepting_submissions(),
            error: self.error.clone(),
            findings: self.findings.as_slice().to_vec(),
            tree: self.tree.clone(),
            started_at: self.started_at,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The submission control is live while nothing is in flight: before
    /// the first submission, after a terminal phase, or once every declared
    /// unit has been counted.
    pub fn accepting_submissions(&self) -> bool {
        self.phase == Phase::Idle || self.phase.is_terminal() || self.progress.is_complete()
    }

    /// Tear the session down: no further mutation is accepted. In-flight
    /// aggregator state is simply discarded with it; nothing external needs
    /// cleanup.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.progress.reset();
        self.findings.clear();
        self.tree.clear();
        self.loading = false;
        self.error = None;
        self.started_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn finding_event(location: &str) -> InboundEvent {
        InboundEvent::UnitProcessed(Finding {
            category: "XSS".to_string(),
            location: location.to_string(),
            description: "d".to_string(),
            remediation: "r".to_string(),
        })
    }

    fn submitted_session() -> ScanSession {
        let mut session = ScanSession::new("github.com");
        session.submit("https://github.com/acme/widgets").unwrap();
        session
    }

    #[test]
    fn test_submit_derives_label_and_engages_loading() {
        let mut session = ScanSession::new("github.com");
        let request = session.submit("https://github.com/acme/widgets").unwrap();
        assert_eq!(request.url, "https://github.com/acme/widgets");

        let snap = session.snapshot();
        assert_eq!(snap.label.as_deref(), Some("widgets"));
        assert_eq!(snap.phase, Phase::Submitted);
        assert!(snap.loading);
        assert!(!snap.accepting_submissions);
        assert!(snap.started_at.is_some());
    }

    #[test]
    fn test_rejected_submission_touches_nothing() {
        let mut session = submitted_session();
        session.handle_event(InboundEvent::TotalUnits(2));
        session.handle_event(finding_event("a.js"));

        let before = session.snapshot();
        let err = session.submit("https://gitlab.com/acme/widgets").unwrap_err();
        assert!(matches!(err, VigilError::InvalidRepository(_)));

        let after = session.snapshot();
        assert_eq!(after.phase, before.phase);
        assert_eq!(after.findings.len(), before.findings.len());
        assert_eq!(after.processed_units, before.processed_units);
        assert_eq!(after.loading, before.loading);
        assert_eq!(after.session_id, before.session_id);
    }

    #[test]
    fn test_full_scan_scenario() {
        let mut session = submitted_session();

        session.handle_event(InboundEvent::TotalUnits(4));
        assert_eq!(session.phase(), Phase::Running);

        for location in ["a.js", "b.js", "c.js", "d.js"] {
            session.handle_event(finding_event(location));
        }
        session.handle_event(InboundEvent::Completed);

        let snap = session.snapshot();
        assert_eq!(snap.percentage, 100);
        assert_eq!(snap.findings.len(), 4);
        assert_eq!(snap.phase, Phase::Completed);
        assert!(snap.accepting_submissions);
        assert!(!snap.loading);
    }

    #[test]
    fn test_unit_event_counts_and_stores_atomically() {
        let mut session = submitted_session();
        session.handle_event(finding_event("a.js"));

        let snap = session.snapshot();
        assert_eq!(snap.processed_units, 1);
        assert_eq!(snap.findings.len(), 1);
        assert_eq!(snap.phase, Phase::Running);
        assert!(!snap.loading);
    }

    #[test]
    fn test_completion_independent_of_unit_counting() {
        // Completion may arrive without the percentage ever reaching 100.
        let mut session = submitted_session();
        session.handle_event(InboundEvent::TotalUnits(10));
        session.handle_event(finding_event("a.js"));
        session.handle_event(InboundEvent::Completed);

        let snap = session.snapshot();
        assert_eq!(snap.phase, Phase::Completed);
        assert_eq!(snap.percentage, 10);
    }

    #[test]
    fn test_error_fails_session_and_keeps_findings() {
        let mut session = submitted_session();
        session.handle_event(InboundEvent::TotalUnits(4));
        session.handle_event(finding_event("a.js"));
        session.handle_event(InboundEvent::Error("scan failed".to_string()));

        let snap = session.snapshot();
        assert_eq!(snap.phase, Phase::Failed);
        assert_eq!(snap.error.as_deref(), Some("scan failed"));
        assert_eq!(snap.findings.len(), 1);
        assert!(snap.accepting_submissions);
        assert!(!snap.loading);
    }

    #[test]
    fn test_error_in_submitted_phase() {
        let mut session = submitted_session();
        session.handle_event(InboundEvent::Error("container died".to_string()));
        assert_eq!(session.phase(), Phase::Failed);
    }

    #[test]
    fn test_file_list_replaces_tree_wholesale() {
        let mut session = submitted_session();
        session.handle_event(InboundEvent::FileList(vec!["old/a.js".into()]));
        session.handle_event(InboundEvent::FileList(vec!["new/b.js".into(), "c.js".into()]));

        let snap = session.snapshot();
        assert_eq!(snap.phase, Phase::Submitted);
        assert_eq!(snap.tree.len(), 2);
        assert_eq!(snap.tree[0].label(), "new");
        let json = serde_json::to_value(&snap.tree).unwrap();
        assert_eq!(
            json,
            json!([
                {"label": "new", "children": [{"label": "b.js"}]},
                {"label": "c.js"},
            ])
        );
    }

    #[test]
    fn test_events_in_idle_do_not_start_a_phase() {
        let mut session = ScanSession::new("github.com");
        session.handle_event(InboundEvent::TotalUnits(4));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.snapshot().total_units, Some(4));
    }

    #[test]
    fn test_terminal_phase_is_sticky_for_stragglers() {
        let mut session = submitted_session();
        session.handle_event(InboundEvent::TotalUnits(2));
        session.handle_event(InboundEvent::Error("scan failed".to_string()));

        session.handle_event(finding_event("late.js"));
        session.handle_event(InboundEvent::Completed);

        let snap = session.snapshot();
        assert_eq!(snap.phase, Phase::Failed);
        // The straggler was still counted and stored.
        assert_eq!(snap.findings.len(), 1);
        assert_eq!(snap.processed_units, 1);
    }

    #[test]
    fn test_resubmission_after_failure_resets_everything() {
        let mut session = submitted_session();
        session.handle_event(InboundEvent::TotalUnits(2));
        session.handle_event(finding_event("a.js"));
        session.handle_event(InboundEvent::Error("scan failed".to_string()));

        let failed_id = session.snapshot().session_id;
        session.submit("github.com/acme/other.git").unwrap();

        let snap = session.snapshot();
        assert_eq!(snap.phase, Phase::Submitted);
        assert_eq!(snap.label.as_deref(), Some("other"));
        assert!(snap.findings.is_empty());
        assert!(snap.tree.is_empty());
        assert_eq!(snap.processed_units, 0);
        assert_eq!(snap.total_units, None);
        assert!(snap.error.is_none());
        assert_ne!(snap.session_id, failed_id);
    }

    #[test]
    fn test_dispose_blocks_further_mutation() {
        let mut session = submitted_session();
        session.handle_event(finding_event("a.js"));
        session.dispose();

        session.handle_event(finding_event("b.js"));
        assert!(session.submit("github.com/acme/widgets").is_err());

        let snap = session.snapshot();
        assert_eq!(snap.findings.len(), 1);
    }

    #[test]
    fn test_connection_loss_uses_error_recovery_path() {
        let mut session = submitted_session();
        session.handle_event(finding_event("a.js"));
        session.fail("connection lost");

        let snap = session.snapshot();
        assert_eq!(snap.phase, Phase::Failed);
        assert_eq!(snap.error.as_deref(), Some("connection lost"));
        assert_eq!(snap.findings.len(), 1);
        assert!(snap.accepting_submissions);
    }
}
