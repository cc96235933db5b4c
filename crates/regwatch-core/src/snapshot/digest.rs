//! Content fingerprints for snapshot deduplication.
//!
//! The fingerprint is the SHA-256 digest (lowercase hex, 64 characters) of
//! the section map's canonical serialization: a compact JSON object whose
//! keys are emitted in sorted order and whose values are the section texts
//! verbatim (standard JSON string escaping). Version labels, effective
//! dates and capture timestamps are not part of the fingerprint, so
//! re-capturing unchanged content under a new label deduplicates.

use crate::errors::RegwatchError;
use crate::model::SectionMap;
use sha2::{Digest, Sha256};

/// Compute the content fingerprint of a section map.
///
/// # Errors
///
/// Returns `RegwatchError::Serialization` if canonical serialization fails.
///
/// # Example
///
/// ```
/// use regwatch_core::model::SectionMap;
/// use regwatch_core::snapshot::digest::compute_fingerprint;
///
/// let sections = SectionMap::from_pairs([("1.101", "Purpose.")]).unwrap();
/// let fingerprint = compute_fingerprint(&sections).unwrap();
/// assert_eq!(fingerprint.len(), 64);
/// ```
pub fn compute_fingerprint(sections: &SectionMap) -> Result<String, RegwatchError> {
    let canonical = sections.canonical_json()?;
    Ok(hash_canonical(&canonical))
}

/// SHA-256 hex digest of an already-canonical serialization.
///
/// Stores use this to re-verify persisted section JSON on load.
pub fn hash_canonical(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
