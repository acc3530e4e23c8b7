//! Transaction ledger entries
//!
//! One entry per mutating operation, mirroring the commit log of the
//! external distributed ledger the record is anchored to. The `tx_id` may
//! be assigned by that substrate; when a caller supplies none, a unique id
//! is generated locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::actor::Role;
use crate::models::record::RequestStatus;

/// Ledger action tag recorded by [`assign_to_officer`](crate::transition::assign_to_officer)
pub const ACTION_ASSIGN_TO_OFFICER: &str = "ASSIGN_TO_OFFICER";

/// Ledger action tag for a generic transition into `status`
pub fn change_status_action(status: RequestStatus) -> String {
    format!("CHANGE_STATUS_TO_{}", status.name())
}

/// One audit-trail entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionEntry {
    /// Unique transaction id, substrate-assigned or generated
    pub tx_id: String,

    /// Free-form action tag (e.g., `CHANGE_STATUS_TO_ASSIGNED`)
    pub action: String,

    /// Actor who performed the mutation
    pub user_id: String,

    /// Actor's role at the time of the mutation
    pub role: Role,

    /// When the mutation happened
    pub timestamp: DateTime<Utc>,

    /// Opaque payload capturing the mutation's options
    #[serde(default)]
    pub details: Value,
}

impl TransactionEntry {
    /// Use the substrate-assigned id when present, else generate one
    pub fn tx_id_or_generated(tx_id: Option<String>) -> String {
        tx_id.unwrap_or_else(|| format!("tx-{}", Uuid::new_v4()))
    }
}
