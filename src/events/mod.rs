//! Wire contract with the scanning backend.
//!
//! The backend speaks JSON text frames over one duplex channel and tags
//! nothing: each inbound message is classified by which recognized field is
//! present, checked in a fixed precedence order. Classification happens once
//! at the boundary against a closed union; anything that matches none of
//! the recognized shapes is dropped before it can reach session state.

use serde::Serialize;
use serde_json::Value;

use crate::models::Finding;

/// Outbound scan request frame: `{"url": "<repository reference>"}`.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRequest {
    pub url: String,
}

/// A validated inbound message from the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// One repository unit was processed and produced a finding.
    UnitProcessed(Finding),
    /// Total number of units this scan will report progress against.
    TotalUnits(u64),
    /// The backend declared the scan finished.
    Completed,
    /// The backend aborted the scan with a human-readable message.
    Error(String),
    /// Authoritative flat list of repository paths.
    FileList(Vec<String>),
}

impl InboundEvent {
    /// Classify a raw JSON frame. Returns `None` for anything that is not a
    /// JSON object or matches none of the recognized shapes, including
    /// half-recognizable frames (a known key with wrong field types).
    pub fn classify(message: &Value) -> Option<Self> {
        let obj = message.as_object()?;

        // 1. Finding frame: flag plus all four payload strings.
        if obj.get("any_vulnerability_found").and_then(Value::as_bool) == Some(true) {
            let finding = (|| {
                Some(Finding {
                    category: obj.get("vulnerability_type")?.as_str()?.to_string(),
                    location: obj.get("location")?.as_str()?.to_string(),
                    description: obj.get("vulnerability_description")?.as_str()?.to_string(),
                    remediation: obj.get("solution_description")?.as_str()?.to_string(),
                })
            })();
            if let Some(finding) = finding {
                return Some(InboundEvent::UnitProcessed(finding));
            }
        }

        // 2. Total unit count; the backend sends numbers or numeric strings.
        if let Some(value) = obj.get("file_length") {
            if let Some(total) = number_like(value) {
                return Some(InboundEvent::TotalUnits(total));
            }
        }

        // 3. Completion signal.
        if obj.get("status").and_then(Value::as_str) == Some("completed") {
            return Some(InboundEvent::Completed);
        }

        // 4. Backend error.
        if let Some(message) = obj.get("error").and_then(Value::as_str) {
            return Some(InboundEvent::Error(message.to_string()));
        }

        // 5. File list; every element must be a string.
        if let Some(entries) = obj.get("file_structure").and_then(Value::as_array) {
            let paths: Option<Vec<String>> = entries
                .iter()
                .map(|e| e.as_str().map(str::to_string))
                .collect();
            if let Some(paths) = paths {
                return Some(InboundEvent::FileList(paths));
            }
        }

        None
    }

    /// Parse and classify one text frame. Malformed JSON and unrecognized
    /// shapes both collapse to `None`; protocol noise is never fatal.
    pub fn from_frame(frame: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(frame).ok()?;
        Self::classify(&value)
    }
}

fn number_like(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
