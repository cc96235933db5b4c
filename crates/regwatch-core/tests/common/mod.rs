use regwatch_core::snapshot::compute_fingerprint;
use regwatch_core::{SectionMap, Snapshot};

/// Section map from literal pairs
#[allow(dead_code)]
pub fn sections(pairs: &[(&str, &str)]) -> SectionMap {
    SectionMap::from_pairs(pairs.iter().copied()).unwrap()
}

/// Fingerprinted snapshot of document "far", bypassing any store
#[allow(dead_code)]
pub fn snapshot(snapshot_id: &str, pairs: &[(&str, &str)]) -> Snapshot {
    snapshot_of(sections(pairs), snapshot_id)
}

#[allow(dead_code)]
pub fn snapshot_of(sections: SectionMap, snapshot_id: &str) -> Snapshot {
    Snapshot {
        snapshot_id: snapshot_id.to_string(),
        document_id: "far".to_string(),
        version_label: format!("label-{snapshot_id}"),
        effective_date: "2025-01-01".to_string(),
        content_fingerprint: compute_fingerprint(&sections).unwrap(),
        sections,
        captured_at: "2025-01-01T00:00:00Z".to_string(),
        is_latest: false,
    }
}
