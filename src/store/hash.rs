use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::store::Document;

const ID_LEN: usize = 24;

pub fn compute_hash(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

/// 24 hex characters derived from where and when the document was inserted.
pub fn new_document_id(
    collection: &str,
    now: DateTime<Utc>,
    sequence: u64,
    document: &Document,
) -> String {
    let nanos = now.timestamp_nanos_opt().unwrap_or_default();
    let body = serde_json::to_string(document).unwrap_or_default();
    let mut hash = compute_hash(&format!("{collection}:{nanos}:{sequence}:{body}"));
    hash.truncate(ID_LEN);
    hash
}
