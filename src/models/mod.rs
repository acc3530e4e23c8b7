pub mod actor;
pub mod attachment;
pub mod record;
pub mod transaction;

pub use actor::{Actor, Role};
pub use attachment::{Attachment, AttachmentDraft};
pub use record::{Note, Priority, RecordSeed, RequestRecord, RequestStatus};
pub use transaction::TransactionEntry;
