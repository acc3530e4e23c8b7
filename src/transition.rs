//! TransitionValidator - status transitions and authorization
//!
//! The sole authority for moving a record between lifecycle statuses.
//! A command is applied to an immutable snapshot and produces a new
//! snapshot plus exactly one ledger entry; a rejected command produces
//! nothing, so failures are all-or-nothing by construction.
//!
//! Any status is reachable from any other, including re-entering
//! COMPLETED or REJECTED. What is enforced are the per-target
//! preconditions:
//! - ASSIGNED requires `assigned_to`
//! - COMPLETED requires `document_id`
//! - REJECTED requires `reason`
//! - every target except PENDING requires an officer or chairman

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Result, TransitionError};
use crate::models::record::next_timestamp;
use crate::models::transaction::{change_status_action, ACTION_ASSIGN_TO_OFFICER};
use crate::models::{Actor, Note, RequestRecord, RequestStatus, TransactionEntry};

/// Options accompanying a transition command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionOptions {
    /// Officer to assign the request to (required for ASSIGNED)
    #[serde(default)]
    pub assigned_to: Option<String>,

    /// Issued document id (required for COMPLETED)
    #[serde(default)]
    pub document_id: Option<String>,

    /// Rejection reason (required for REJECTED)
    #[serde(default)]
    pub reason: Option<String>,

    /// Free-text comment appended to the record's note log
    #[serde(default)]
    pub notes: Option<String>,

    /// Transaction id assigned by the commit substrate; generated if absent
    #[serde(default)]
    pub tx_id: Option<String>,
}

impl TransitionOptions {
    /// Opaque ledger payload capturing the supplied options
    fn to_details(&self) -> Value {
        let mut details = Map::new();
        for (key, value) in [
            ("assigned_to", &self.assigned_to),
            ("document_id", &self.document_id),
            ("reason", &self.reason),
            ("notes", &self.notes),
        ] {
            if let Some(value) = value {
                details.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        Value::Object(details)
    }
}

/// A mutation intent: move a record into `new_status` on behalf of `actor`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionCommand {
    pub new_status: RequestStatus,
    pub actor: Actor,
    pub options: TransitionOptions,
}

impl TransitionCommand {
    pub fn new(new_status: RequestStatus, actor: Actor) -> Self {
        Self {
            new_status,
            actor,
            options: TransitionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TransitionOptions) -> Self {
        self.options = options;
        self
    }

    /// Apply this command to a snapshot, producing the next snapshot.
    ///
    /// Authorization and required-option checks run before any field of
    /// the new snapshot is derived; on failure the error is returned and
    /// nothing else happened. On success the returned record carries the
    /// new status, its dependent fields, a strictly advanced
    /// `updated_at`, an optional note line, and exactly one new ledger
    /// entry tagged `CHANGE_STATUS_TO_<status>`.
    pub fn apply(&self, record: &RequestRecord) -> Result<RequestRecord> {
        let target = self.new_status;
        authorize(target, &self.actor)?;

        match target {
            RequestStatus::Assigned => require(&self.options.assigned_to, target, "assigned_to")?,
            RequestStatus::Completed => require(&self.options.document_id, target, "document_id")?,
            RequestStatus::Rejected => require(&self.options.reason, target, "reason")?,
            RequestStatus::Pending | RequestStatus::Processing => {}
        }

        let mut next = record.clone();
        let now = next_timestamp(record.updated_at);

        match target {
            RequestStatus::Assigned => {
                next.assigned_to = self.options.assigned_to.clone();
                next.assigned_at = Some(now);
                next.assigned_by = Some(self.actor.user_id.clone());
            }
            RequestStatus::Completed => {
                next.completed_at = Some(now);
                next.completed_by = Some(self.actor.user_id.clone());
                next.document_id = self.options.document_id.clone();
            }
            RequestStatus::Rejected => {
                next.rejected_by = Some(self.actor.user_id.clone());
                next.rejection_reason = self.options.reason.clone();
            }
            RequestStatus::Pending | RequestStatus::Processing => {}
        }

        if let Some(text) = self.options.notes.as_deref().filter(|t| !t.is_empty()) {
            next.notes.push(Note {
                user_id: self.actor.user_id.clone(),
                role: self.actor.role,
                text: text.to_string(),
                timestamp: now,
            });
        }

        next.status = target;
        next.transaction_history.append(TransactionEntry {
            tx_id: TransactionEntry::tx_id_or_generated(self.options.tx_id.clone()),
            action: change_status_action(target),
            user_id: self.actor.user_id.clone(),
            role: self.actor.role,
            timestamp: now,
            details: self.options.to_details(),
        })?;
        next.updated_at = now;

        debug!(
            request_id = %next.request_id,
            status = %target,
            user_id = %self.actor.user_id,
            "status transition applied"
        );
        Ok(next)
    }
}

/// Assign a record to an officer.
///
/// Specialization of the transition into ASSIGNED with its own ledger
/// action tag, `ASSIGN_TO_OFFICER`. It performs its own role check rather
/// than delegating through [`TransitionCommand::apply`].
pub fn assign_to_officer(
    record: &RequestRecord,
    officer_id: &str,
    actor: &Actor,
) -> Result<RequestRecord> {
    let target = RequestStatus::Assigned;
    if !actor.role.can_drive_lifecycle() {
        warn!(
            request_id = %record.request_id,
            role = %actor.role,
            user_id = %actor.user_id,
            "assignment denied"
        );
        return Err(TransitionError::PermissionDenied {
            role: actor.role,
            target,
        }
        .into());
    }
    if officer_id.is_empty() {
        return Err(TransitionError::MissingOption {
            target,
            option: "assigned_to",
        }
        .into());
    }

    let mut next = record.clone();
    let now = next_timestamp(record.updated_at);

    next.status = target;
    next.assigned_to = Some(officer_id.to_string());
    next.assigned_at = Some(now);
    next.assigned_by = Some(actor.user_id.clone());

    let mut details = Map::new();
    details.insert(
        "assigned_to".to_string(),
        Value::String(officer_id.to_string()),
    );
    next.transaction_history.append(TransactionEntry {
        tx_id: TransactionEntry::tx_id_or_generated(None),
        action: ACTION_ASSIGN_TO_OFFICER.to_string(),
        user_id: actor.user_id.clone(),
        role: actor.role,
        timestamp: now,
        details: Value::Object(details),
    })?;
    next.updated_at = now;

    debug!(
        request_id = %next.request_id,
        assigned_to = %officer_id,
        user_id = %actor.user_id,
        "request assigned to officer"
    );
    Ok(next)
}

/// Role gate: every target except PENDING needs an officer or chairman
fn authorize(target: RequestStatus, actor: &Actor) -> std::result::Result<(), TransitionError> {
    match target {
        RequestStatus::Pending => Ok(()),
        RequestStatus::Assigned
        | RequestStatus::Processing
        | RequestStatus::Completed
        | RequestStatus::Rejected => {
            if actor.role.can_drive_lifecycle() {
                Ok(())
            } else {
                warn!(
                    role = %actor.role,
                    target = %target,
                    user_id = %actor.user_id,
                    "transition denied"
                );
                Err(TransitionError::PermissionDenied {
                    role: actor.role,
                    target,
                })
            }
        }
    }
}

fn require(
    option: &Option<String>,
    target: RequestStatus,
    name: &'static str,
) -> std::result::Result<(), TransitionError> {
    match option.as_deref() {
        Some(value) if !value.is_empty() => Ok(()),
        _ => Err(TransitionError::MissingOption {
            target,
            option: name,
        }),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocketError;
    use crate::models::{RecordSeed, Role};

    fn record() -> RequestRecord {
        RequestRecord::new(RecordSeed {
            request_id: "R1".to_string(),
            citizen_id: "C1".to_string(),
            document_type: "birth_certificate".to_string(),
            ..RecordSeed::default()
        })
    }

    fn officer() -> Actor {
        Actor::new("O1", Role::Officer)
    }

    #[test]
    fn test_assign_sets_assignment_fields() {
        let record = record();
        let command = TransitionCommand::new(RequestStatus::Assigned, officer()).with_options(
            TransitionOptions {
                assigned_to: Some("O1".to_string()),
                ..TransitionOptions::default()
            },
        );

        let next = command.apply(&record).unwrap();
        assert_eq!(next.status, RequestStatus::Assigned);
        assert_eq!(next.assigned_to.as_deref(), Some("O1"));
        assert_eq!(next.assigned_by.as_deref(), Some("O1"));
        assert!(next.assigned_at.is_some());
        assert_eq!(next.transaction_history.len(), 1);
        assert_eq!(
            next.transaction_history.last().unwrap().action,
            "CHANGE_STATUS_TO_ASSIGNED"
        );
        // The input snapshot is untouched
        assert_eq!(record.status, RequestStatus::Pending);
        assert!(record.transaction_history.is_empty());
    }

    #[test]
    fn test_citizen_may_not_complete() {
        let record = record();
        let command =
            TransitionCommand::new(RequestStatus::Completed, Actor::new("C1", Role::Citizen))
                .with_options(TransitionOptions {
                    document_id: Some("DOC-1".to_string()),
                    ..TransitionOptions::default()
                });

        match command.apply(&record) {
            Err(DocketError::Transition(TransitionError::PermissionDenied { role, target })) => {
                assert_eq!(role, Role::Citizen);
                assert_eq!(target, RequestStatus::Completed);
            }
            other => panic!("expected PermissionDenied, got {:?}", other),
        }
    }

    #[test]
    fn test_anyone_may_move_back_to_pending() {
        let record = record();
        let command =
            TransitionCommand::new(RequestStatus::Pending, Actor::new("C1", Role::Citizen));
        let next = command.apply(&record).unwrap();
        assert_eq!(next.status, RequestStatus::Pending);
        assert_eq!(next.transaction_history.len(), 1);
    }

    #[test]
    fn test_complete_without_document_id_is_rejected() {
        let record = record();
        let command = TransitionCommand::new(RequestStatus::Completed, officer());

        match command.apply(&record) {
            Err(DocketError::Transition(TransitionError::MissingOption { option, .. })) => {
                assert_eq!(option, "document_id");
            }
            other => panic!("expected MissingOption, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_required_option_counts_as_missing() {
        let record = record();
        let command = TransitionCommand::new(RequestStatus::Rejected, officer()).with_options(
            TransitionOptions {
                reason: Some(String::new()),
                ..TransitionOptions::default()
            },
        );
        assert!(command.apply(&record).is_err());
    }

    #[test]
    fn test_note_is_appended_with_author() {
        let record = record();
        let command = TransitionCommand::new(RequestStatus::Processing, officer()).with_options(
            TransitionOptions {
                notes: Some("started on the paperwork".to_string()),
                ..TransitionOptions::default()
            },
        );

        let next = command.apply(&record).unwrap();
        assert_eq!(next.notes.len(), 1);
        assert_eq!(
            next.notes_text(),
            "officer (O1): started on the paperwork"
        );
    }

    #[test]
    fn test_supplied_tx_id_is_used() {
        let record = record();
        let command = TransitionCommand::new(RequestStatus::Processing, officer()).with_options(
            TransitionOptions {
                tx_id: Some("tx-block-7".to_string()),
                ..TransitionOptions::default()
            },
        );

        let next = command.apply(&record).unwrap();
        assert_eq!(next.transaction_history.last().unwrap().tx_id, "tx-block-7");
    }

    #[test]
    fn test_ledger_details_capture_options() {
        let record = record();
        let command = TransitionCommand::new(RequestStatus::Rejected, officer()).with_options(
            TransitionOptions {
                reason: Some("incomplete paperwork".to_string()),
                ..TransitionOptions::default()
            },
        );

        let next = command.apply(&record).unwrap();
        let entry = next.transaction_history.last().unwrap();
        assert_eq!(entry.details["reason"], "incomplete paperwork");
        assert_eq!(entry.user_id, "O1");
    }

    #[test]
    fn test_rejected_is_reenterable() {
        let record = record();
        let reject = TransitionCommand::new(RequestStatus::Rejected, officer()).with_options(
            TransitionOptions {
                reason: Some("incomplete paperwork".to_string()),
                ..TransitionOptions::default()
            },
        );

        let once = reject.apply(&record).unwrap();
        assert!(once.validate().is_ok());

        let twice = reject.apply(&once).unwrap();
        assert_eq!(twice.status, RequestStatus::Rejected);
        assert_eq!(twice.transaction_history.len(), 2);
    }

    #[test]
    fn test_assign_to_officer_uses_its_own_action_tag() {
        let record = record();
        let next = assign_to_officer(&record, "O2", &officer()).unwrap();

        assert_eq!(next.status, RequestStatus::Assigned);
        assert_eq!(next.assigned_to.as_deref(), Some("O2"));
        assert_eq!(next.assigned_by.as_deref(), Some("O1"));
        assert_eq!(
            next.transaction_history.last().unwrap().action,
            "ASSIGN_TO_OFFICER"
        );
    }

    #[test]
    fn test_assign_to_officer_checks_role_itself() {
        let record = record();
        let result = assign_to_officer(&record, "O2", &Actor::new("C1", Role::Citizen));
        assert!(matches!(
            result,
            Err(DocketError::Transition(
                TransitionError::PermissionDenied { .. }
            ))
        ));
    }

    #[test]
    fn test_updated_at_strictly_advances() {
        let record = record();
        let command = TransitionCommand::new(RequestStatus::Processing, officer());

        let once = command.apply(&record).unwrap();
        let twice = command.apply(&once).unwrap();
        assert!(once.updated_at > record.updated_at);
        assert!(twice.updated_at > once.updated_at);
    }
}
