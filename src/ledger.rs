//! TransactionLedger - append-only audit history embedded in a record
//!
//! Ordered history of every mutating operation performed on a record,
//! mirroring an external distributed ledger's commit log. Entries are
//! never removed or reordered. Read access is the full sequence; paging
//! and windowing belong to an external query service. UI and reporting
//! layers derive all activity feeds from this sequence rather than from
//! ad hoc side fields.

use serde::{Deserialize, Serialize};

use crate::error::{DocketError, Result};
use crate::models::TransactionEntry;

/// Append-only ordered sequence of [`TransactionEntry`] values
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TransactionLedger(Vec<TransactionEntry>);

impl TransactionLedger {
    /// Append one entry.
    ///
    /// Entries missing `tx_id`, `action`, or `user_id` are rejected and
    /// the ledger is left untouched.
    pub fn append(&mut self, entry: TransactionEntry) -> Result<()> {
        if entry.tx_id.is_empty() {
            return Err(DocketError::MissingField("tx_id"));
        }
        if entry.action.is_empty() {
            return Err(DocketError::MissingField("action"));
        }
        if entry.user_id.is_empty() {
            return Err(DocketError::MissingField("user_id"));
        }
        self.0.push(entry);
        Ok(())
    }

    /// Full ordered history, oldest first
    pub fn entries(&self) -> &[TransactionEntry] {
        &self.0
    }

    /// Most recent entry, if any
    pub fn last(&self) -> Option<&TransactionEntry> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a TransactionLedger {
    type Item = &'a TransactionEntry;
    type IntoIter = std::slice::Iter<'a, TransactionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Utc;
    use serde_json::Value;

    fn entry(tx_id: &str, action: &str, user_id: &str) -> TransactionEntry {
        TransactionEntry {
            tx_id: tx_id.to_string(),
            action: action.to_string(),
            user_id: user_id.to_string(),
            role: Role::Officer,
            timestamp: Utc::now(),
            details: Value::Null,
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let mut ledger = TransactionLedger::default();
        ledger.append(entry("tx-1", "CREATE_REQUEST", "C1")).unwrap();
        ledger
            .append(entry("tx-2", "CHANGE_STATUS_TO_ASSIGNED", "O1"))
            .unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.entries()[0].tx_id, "tx-1");
        assert_eq!(ledger.last().unwrap().tx_id, "tx-2");
    }

    #[test]
    fn test_append_rejects_missing_fields() {
        let mut ledger = TransactionLedger::default();

        for bad in [
            entry("", "CREATE_REQUEST", "C1"),
            entry("tx-1", "", "C1"),
            entry("tx-1", "CREATE_REQUEST", ""),
        ] {
            match ledger.append(bad) {
                Err(DocketError::MissingField(_)) => {}
                other => panic!("expected MissingField, got {:?}", other),
            }
        }
        assert!(ledger.is_empty());
    }
}
