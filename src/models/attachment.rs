//! Attachment metadata
//!
//! File metadata referencing blobs stored outside this core. The
//! `content_hash` integrity fingerprint is computed by the external upload
//! pipeline over the blob's bytes; this module stores it and offers the
//! read-side check against candidate bytes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Metadata for one file associated with a record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    /// Unique within the owning record
    pub attachment_id: String,

    /// Display name, defaulted to `attachment-<n>` when absent at add time
    pub file_name: String,

    /// MIME type or extension tag
    pub file_type: String,

    /// Integrity fingerprint over the blob's bytes, `sha256:<hex>`
    pub content_hash: String,

    /// Blob size in bytes as reported by the upload pipeline
    pub size: u64,

    /// Uploader, defaulted to the record's citizen
    pub uploaded_by: String,

    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,

    /// Free-text description
    #[serde(default)]
    pub description: String,
}

impl Attachment {
    /// Check the stored fingerprint against candidate blob bytes.
    ///
    /// Fingerprints use the `sha256:<hex>` form; a hash in any other
    /// format never matches.
    pub fn matches_content(&self, content: &[u8]) -> bool {
        let mut hasher = Sha256::new();
        hasher.update(content);
        self.content_hash == format!("sha256:{:x}", hasher.finalize())
    }
}

/// Permissive input form for [`add_attachment`](crate::registry::add_attachment)
///
/// Only `attachment_id`, `file_type`, and `content_hash` are required;
/// everything else has a documented default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttachmentDraft {
    pub attachment_id: String,
    pub file_type: String,
    pub content_hash: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
}
