//! AttachmentRegistry - attachment metadata operations
//!
//! Tracks citizen- or officer-supplied file metadata referencing blobs
//! stored elsewhere. Attachments are append-only; nothing in this core
//! removes one. Integrity hashes are computed by the upload pipeline,
//! never here.

use tracing::debug;

use crate::error::{DocketError, Result};
use crate::models::record::next_timestamp;
use crate::models::{Attachment, AttachmentDraft, RequestRecord};

/// Add one attachment to a record, returning the updated snapshot.
///
/// A draft missing `attachment_id`, `file_type`, or `content_hash` is
/// rejected with the input snapshot untouched. Defaults: `file_name` is
/// `attachment-<n+1>` where n is the current attachment count,
/// `uploaded_by` is the record's `citizen_id`, `uploaded_at` is now,
/// `size` is 0, `description` is empty. The record's `updated_at` is
/// advanced.
pub fn add_attachment(record: &RequestRecord, draft: AttachmentDraft) -> Result<RequestRecord> {
    if draft.attachment_id.is_empty() {
        return Err(DocketError::MissingField("attachment_id"));
    }
    if draft.file_type.is_empty() {
        return Err(DocketError::MissingField("file_type"));
    }
    if draft.content_hash.is_empty() {
        return Err(DocketError::MissingField("content_hash"));
    }

    let mut next = record.clone();
    let now = next_timestamp(record.updated_at);

    let attachment = Attachment {
        attachment_id: draft.attachment_id,
        file_name: draft
            .file_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("attachment-{}", record.attachments.len() + 1)),
        file_type: draft.file_type,
        content_hash: draft.content_hash,
        size: draft.size.unwrap_or(0),
        uploaded_by: draft
            .uploaded_by
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| record.citizen_id.clone()),
        uploaded_at: draft.uploaded_at.unwrap_or(now),
        description: draft.description.unwrap_or_default(),
    };

    debug!(
        request_id = %next.request_id,
        attachment_id = %attachment.attachment_id,
        uploaded_by = %attachment.uploaded_by,
        "attachment added"
    );

    next.attachments.push(attachment);
    next.updated_at = now;
    Ok(next)
}

// =============================================================================
// Tests
// =============================================================================
