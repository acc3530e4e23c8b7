//! RequestRecord - one citizen's administrative-document request
//!
//! Holds the current snapshot of a single request: identity, lifecycle
//! status, assignment/completion/rejection fields, attachments, the
//! structured note log, and the embedded transaction ledger.
//!
//! The record is the sole owner of its attachments, notes, and ledger
//! entries; collaborators mutate it only through the crate's operations
//! (status transitions in [`crate::transition`], attachment adds in
//! [`crate::registry`], ledger appends via [`record_transaction`]).
//! A completed or rejected record is never deleted - it stays queryable
//! as a historical artifact.
//!
//! [`record_transaction`]: RequestRecord::record_transaction

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DocketError, Result, TransitionError};
use crate::ledger::TransactionLedger;
use crate::models::actor::Role;
use crate::models::attachment::Attachment;
use crate::models::transaction::TransactionEntry;

/// Lifecycle status of a request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    /// Waiting at intake, not yet picked up
    Pending,
    /// Assigned to an officer
    Assigned,
    /// Officer is working on the document
    Processing,
    /// Document issued
    Completed,
    /// Request turned down
    Rejected,
}

impl RequestStatus {
    /// Wire tag, as committed to the ledger
    pub fn name(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Assigned => "ASSIGNED",
            RequestStatus::Processing => "PROCESSING",
            RequestStatus::Completed => "COMPLETED",
            RequestStatus::Rejected => "REJECTED",
        }
    }

    /// Parse a wire status tag (case-insensitive).
    ///
    /// Command submitters hand over raw strings; this is where an
    /// unrecognized target surfaces as [`TransitionError::UnknownStatus`].
    pub fn parse(s: &str) -> std::result::Result<Self, TransitionError> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(RequestStatus::Pending),
            "ASSIGNED" => Ok(RequestStatus::Assigned),
            "PROCESSING" => Ok(RequestStatus::Processing),
            "COMPLETED" => Ok(RequestStatus::Completed),
            "REJECTED" => Ok(RequestStatus::Rejected),
            _ => Err(TransitionError::UnknownStatus(s.to_string())),
        }
    }

    /// Whether the request has reached an end state
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Rejected)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Processing priority of a request
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl Priority {
    pub fn name(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Normal => "NORMAL",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "LOW" => Some(Priority::Low),
            "NORMAL" => Some(Priority::Normal),
            "HIGH" => Some(Priority::High),
            "URGENT" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

/// One actor comment on a record
///
/// Notes are an append-only log of structured tuples rather than one
/// concatenated string, so audit queries keep the author and timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub user_id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Note {
    /// Display line in the legacy form `"<role> (<user_id>): <text>"`
    pub fn render(&self) -> String {
        format!("{} ({}): {}", self.role, self.user_id, self.text)
    }
}

/// Input for creating a record at intake
///
/// Only the three identity fields matter; priority and details are
/// optional. Empty identity fields are not rejected here - construction
/// is permissive and [`RequestRecord::validate`] is the gate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSeed {
    pub request_id: String,
    pub citizen_id: String,
    pub document_type: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub details: Map<String, Value>,
}

/// One citizen's request for an administrative document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestRecord {
    /// Unique request identifier, immutable after creation
    pub request_id: String,

    /// Requesting citizen, immutable
    pub citizen_id: String,

    /// Kind of document requested (e.g., "birth_certificate"), immutable
    pub document_type: String,

    /// Current lifecycle status
    pub status: RequestStatus,

    /// Processing priority
    #[serde(default)]
    pub priority: Priority,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp, strictly advanced on every mutation
    pub updated_at: DateTime<Utc>,

    /// Set on transition into COMPLETED
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    /// Set on transition into ASSIGNED
    #[serde(default)]
    pub assigned_at: Option<DateTime<Utc>>,

    /// Officer the request is assigned to
    #[serde(default)]
    pub assigned_to: Option<String>,

    /// Actor who performed the assignment
    #[serde(default)]
    pub assigned_by: Option<String>,

    /// Actor who completed the request
    #[serde(default)]
    pub completed_by: Option<String>,

    /// Issued document identifier, mandatory once COMPLETED
    #[serde(default)]
    pub document_id: Option<String>,

    /// Actor who rejected the request
    #[serde(default)]
    pub rejected_by: Option<String>,

    /// Why the request was turned down, mandatory once REJECTED
    #[serde(default)]
    pub rejection_reason: Option<String>,

    /// Opaque payload describing the citizen's request content
    #[serde(default)]
    pub details: Map<String, Value>,

    /// File metadata referencing externally stored blobs, append-only
    #[serde(default)]
    pub attachments: Vec<Attachment>,

    /// Actor comment log, append-only
    #[serde(default)]
    pub notes: Vec<Note>,

    /// Audit trail of every mutating operation, append-only
    #[serde(default)]
    pub transaction_history: TransactionLedger,
}

impl RequestRecord {
    /// Create a record at intake with documented defaults.
    ///
    /// Status starts at PENDING, priority at NORMAL, both timestamps at
    /// now, all collections empty. Construction is permissive: a seed
    /// with empty identity fields yields a record that fails
    /// [`validate`](Self::validate), not a construction error.
    pub fn new(seed: RecordSeed) -> Self {
        let now = Utc::now();
        Self {
            request_id: seed.request_id,
            citizen_id: seed.citizen_id,
            document_type: seed.document_type,
            status: RequestStatus::Pending,
            priority: seed.priority.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            completed_at: None,
            assigned_at: None,
            assigned_to: None,
            assigned_by: None,
            completed_by: None,
            document_id: None,
            rejected_by: None,
            rejection_reason: None,
            details: seed.details,
            attachments: Vec::new(),
            notes: Vec::new(),
            transaction_history: TransactionLedger::default(),
        }
    }

    /// Check every record invariant.
    ///
    /// Read-only and idempotent: calling it twice reports the same result
    /// and mutates nothing. Returns the first violation found as a
    /// human-readable reason.
    pub fn validate(&self) -> Result<()> {
        if self.request_id.is_empty() {
            return Err(DocketError::Validation(
                "request_id must not be empty".to_string(),
            ));
        }
        if self.citizen_id.is_empty() {
            return Err(DocketError::Validation(
                "citizen_id must not be empty".to_string(),
            ));
        }
        if self.document_type.is_empty() {
            return Err(DocketError::Validation(
                "document_type must not be empty".to_string(),
            ));
        }

        if self.updated_at < self.created_at {
            return Err(DocketError::Validation(format!(
                "updated_at {} precedes created_at {}",
                self.updated_at, self.created_at
            )));
        }

        match self.status {
            RequestStatus::Completed => {
                if self.document_id.as_deref().unwrap_or("").is_empty() {
                    return Err(DocketError::Validation(
                        "a COMPLETED record must carry a document_id".to_string(),
                    ));
                }
            }
            RequestStatus::Rejected => {
                if self.rejection_reason.as_deref().unwrap_or("").is_empty() {
                    return Err(DocketError::Validation(
                        "a REJECTED record must carry a rejection_reason".to_string(),
                    ));
                }
            }
            RequestStatus::Pending | RequestStatus::Assigned | RequestStatus::Processing => {}
        }

        for (index, entry) in self.transaction_history.entries().iter().enumerate() {
            if entry.tx_id.is_empty() || entry.action.is_empty() || entry.user_id.is_empty() {
                return Err(DocketError::Validation(format!(
                    "transaction entry {} is missing tx_id, action, or user_id",
                    index
                )));
            }
        }

        for attachment in &self.attachments {
            if attachment.attachment_id.is_empty()
                || attachment.file_type.is_empty()
                || attachment.content_hash.is_empty()
            {
                return Err(DocketError::Validation(format!(
                    "attachment '{}' is missing attachment_id, file_type, or content_hash",
                    attachment.attachment_id
                )));
            }
        }

        Ok(())
    }

    /// Append a ledger entry and advance `updated_at`.
    ///
    /// The ledger is the record's only mechanism for reconstructing what
    /// happened and who did it; every mutating operation funnels through
    /// here or performs the equivalent append itself.
    pub fn record_transaction(&mut self, entry: TransactionEntry) -> Result<()> {
        self.transaction_history.append(entry)?;
        self.updated_at = next_timestamp(self.updated_at);
        Ok(())
    }

    /// Lossless structural serialization of the current snapshot
    pub fn to_snapshot(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Rebuild a record from a snapshot.
    ///
    /// Structural only: a snapshot that parses but violates an invariant
    /// decodes fine and is the caller's job to [`validate`](Self::validate).
    pub fn from_snapshot(snapshot: Value) -> Result<Self> {
        Ok(serde_json::from_value(snapshot)?)
    }

    /// Newline-joined note log in the legacy single-string form
    pub fn notes_text(&self) -> String {
        self.notes
            .iter()
            .map(Note::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Next mutation timestamp: now, nudged forward by a microsecond if the
/// clock has not moved since the previous mutation.
pub(crate) fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

// =============================================================================
// Tests
// =============================================================================
