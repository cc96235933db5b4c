//! Scoring whole regulation parts.
//!
//! The scraper export stores a part as a single section, so one modified
//! section can run to tens of thousands of words.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use regwatch_core::diff::{diff_sections, ChangeKind, DiffOptions};
use regwatch_core::similarity::{similarity, similarity_with, Granularity};
use regwatch_core::SectionMap;
use std::time::{Duration, Instant};

const PART_WORDS: usize = 20_000;

/// Synthetic part text: "the" and "shall" between runs of three terms
/// drawn from a 5000-word vocabulary.
fn part_words(count: usize) -> Vec<String> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    (0..count)
        .map(|k| match k % 8 {
            0 => "the".to_string(),
            4 => "shall".to_string(),
            _ => {
                state = state
                    .wrapping_mul(6_364_136_223_846_793_005)
                    .wrapping_add(1_442_695_040_888_963_407);
                format!("term{}", (state >> 33) % 5000)
            }
        })
        .collect()
}

/// Replace every `step`-th word, starting at `offset`.
fn amend(words: &[String], step: usize, offset: usize) -> Vec<String> {
    words
        .iter()
        .enumerate()
        .map(|(k, w)| {
            if k % step == offset {
                format!("amended{k}")
            } else {
                w.clone()
            }
        })
        .collect()
}

fn timed<F: FnOnce() -> f64>(f: F) -> (f64, Duration) {
    let start = Instant::now();
    let score = f();
    (score, start.elapsed())
}

#[test]
fn test_near_identical_part_scores_quickly() {
    let old = part_words(PART_WORDS).join(" ");
    let new = amend(&part_words(PART_WORDS), 1000, 501).join(" ");

    let (score, elapsed) = timed(|| similarity(&old, &new));

    // 20 of 20000 words replaced
    assert!((score - 0.999).abs() < 1e-9, "got {score}");
    assert!(elapsed < Duration::from_secs(1), "took {elapsed:?}");
}

#[test]
fn test_heavily_amended_part_scores_quickly() {
    let old = part_words(PART_WORDS).join(" ");
    let new = amend(&part_words(PART_WORDS), 50, 7).join(" ");

    let (score, elapsed) = timed(|| similarity(&old, &new));

    // 400 of 20000 words replaced
    assert!((score - 0.98).abs() < 1e-9, "got {score}");
    assert!(elapsed < Duration::from_secs(1), "took {elapsed:?}");
}

#[test]
fn test_near_identical_part_scores_quickly_by_chars() {
    let old = part_words(1_000).join(" ");
    let new = amend(&part_words(1_000), 1000, 501).join(" ");

    let (score, elapsed) = timed(|| similarity_with(&old, &new, Granularity::Chars));

    assert!(score > 0.99 && score < 1.0, "got {score}");
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}

#[test]
fn test_large_part_is_classified_modified() {
    let old = part_words(PART_WORDS).join(" ");
    let new = amend(&part_words(PART_WORDS), 10, 3).join(" ");
    let old_map = SectionMap::from_pairs([("part_52", old.as_str())]).unwrap();
    let new_map = SectionMap::from_pairs([("part_52", new.as_str())]).unwrap();

    let changes = diff_sections(&old_map, &new_map, &DiffOptions::default());

    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind, ChangeKind::Modified);
    let score = changes[0].similarity.unwrap();
    assert!((score - 0.9).abs() < 1e-9, "got {score}");
}
