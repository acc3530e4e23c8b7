// Docket - Administrative request lifecycle core
// Lifecycle records, authorization-gated status transitions, and an
// append-only audit ledger intended for external distributed-ledger anchoring

pub mod codec;
pub mod error;
pub mod ledger;
pub mod models;
pub mod registry;
pub mod transition;

pub use error::{DocketError, Result, TransitionError};

// Re-export commonly used types
pub use ledger::TransactionLedger;
pub use models::{
    Actor, Attachment, AttachmentDraft, Note, Priority, RecordSeed, RequestRecord, RequestStatus,
    Role, TransactionEntry,
};
pub use registry::add_attachment;
pub use transition::{assign_to_officer, TransitionCommand, TransitionOptions};
