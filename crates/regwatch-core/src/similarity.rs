//! Similarity scoring for section content.
//!
//! Ratcliff/Obershelp pattern matching: find the longest common block,
//! recurse into the unmatched pieces on either side, and score
//! `2 * matched / (len(a) + len(b))`. The matcher is generic over the token
//! type so the same code scores word or character sequences and drives the
//! line diff shown in reports. Word scoring skips popular words when
//! indexing long sections; see [`SequenceMatcher::skipping_popular`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Unit the scorer compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Whitespace-delimited words; re-wrapping and spacing noise scores 1.0
    #[default]
    Words,
    /// Unicode scalar values
    Chars,
}

/// A matching block: `a[a..a + size] == b[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// Edit step turning `a[a_start..a_end]` into `b[b_start..b_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub a_start: usize,
    pub a_end: usize,
    pub b_start: usize,
    pub b_end: usize,
}

/// Sequences at least this long drop popular tokens from the index.
const POPULAR_MIN_LEN: usize = 200;

/// Ratcliff/Obershelp matcher over two token slices.
pub struct SequenceMatcher<'a, T: Eq + Hash> {
    a: &'a [T],
    b: &'a [T],
    /// Ascending positions in `b` of each distinct token; empty for popular ones
    b_positions: Vec<Vec<usize>>,
    /// For each token of `a`, its slot in `b_positions` when it is indexed
    a_slots: Vec<Option<usize>>,
}

/// Run-length rows reused across `find_longest_match` calls.
///
/// `prev[j + 1]` holds the length of the run ending at `b[j]` on the
/// previous row of `a`. Only the slots listed in `touched` are non-zero.
struct Scratch {
    prev: Vec<usize>,
    next: Vec<usize>,
    touched: Vec<usize>,
    next_touched: Vec<usize>,
}

impl Scratch {
    fn new(b_len: usize) -> Self {
        Self {
            prev: vec![0; b_len + 1],
            next: vec![0; b_len + 1],
            touched: Vec::new(),
            next_touched: Vec::new(),
        }
    }

    /// Zero the previous row and make the row just filled the previous one.
    fn advance(&mut self) {
        for &k in &self.touched {
            self.prev[k] = 0;
        }
        self.touched.clear();
        std::mem::swap(&mut self.prev, &mut self.next);
        std::mem::swap(&mut self.touched, &mut self.next_touched);
    }

    fn reset(&mut self) {
        for &k in &self.touched {
            self.prev[k] = 0;
        }
        self.touched.clear();
    }
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    /// Exact matcher: every token of `b` is indexed.
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        Self::build(a, b, false)
    }

    /// Matcher that leaves popular tokens out of the index.
    ///
    /// When `b` has at least 200 tokens, tokens filling more than 1% of it
    /// are not indexed. They still join a match by extending a block found
    /// through the remaining tokens, so words like "the" or "shall" do not
    /// turn every row into a scan of `b`. Suited to word tokens; in long
    /// character sequences almost every token is popular.
    pub fn skipping_popular(a: &'a [T], b: &'a [T]) -> Self {
        Self::build(a, b, true)
    }

    fn build(a: &'a [T], b: &'a [T], skip_popular: bool) -> Self {
        let mut slots: HashMap<&'a T, usize> = HashMap::new();
        let mut b_positions: Vec<Vec<usize>> = Vec::new();
        for (j, token) in b.iter().enumerate() {
            let slot = *slots.entry(token).or_insert_with(|| {
                b_positions.push(Vec::new());
                b_positions.len() - 1
            });
            b_positions[slot].push(j);
        }
        if skip_popular && b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            for positions in b_positions.iter_mut().filter(|p| p.len() > limit) {
                positions.clear();
            }
        }
        let a_slots = a
            .iter()
            .map(|token| {
                slots
                    .get(token)
                    .copied()
                    .filter(|&slot| !b_positions[slot].is_empty())
            })
            .collect();
        Self {
            a,
            b,
            b_positions,
            a_slots,
        }
    }

    /// Longest block common to `a[alo..ahi]` and `b[blo..bhi]`; ties go to
    /// the earliest start in `a`, then in `b`.
    fn find_longest_match(
        &self,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
        scratch: &mut Scratch,
    ) -> Match {
        let mut best = Match {
            a: alo,
            b: blo,
            size: 0,
        };
        for i in alo..ahi {
            if let Some(slot) = self.a_slots[i] {
                let positions = &self.b_positions[slot];
                let first = positions.partition_point(|&j| j < blo);
                for &j in &positions[first..] {
                    if j >= bhi {
                        break;
                    }
                    let run = scratch.prev[j] + 1;
                    scratch.next[j + 1] = run;
                    scratch.next_touched.push(j + 1);
                    if run > best.size {
                        best = Match {
                            a: i + 1 - run,
                            b: j + 1 - run,
                            size: run,
                        };
                    }
                }
            }
            scratch.advance();
        }
        scratch.reset();

        // Grow the block through tokens left out of the index
        while best.a > alo && best.b > blo && self.a[best.a - 1] == self.b[best.b - 1] {
            best.a -= 1;
            best.b -= 1;
            best.size += 1;
        }
        while best.a + best.size < ahi
            && best.b + best.size < bhi
            && self.a[best.a + best.size] == self.b[best.b + best.size]
        {
            best.size += 1;
        }
        best
    }

    /// Non-overlapping matching blocks in ascending order, adjacent blocks
    /// merged, terminated by a zero-size sentinel at `(len(a), len(b))`.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let mut scratch = Scratch::new(self.b.len());
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut found = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi, &mut scratch);
            if m.size == 0 {
                continue;
            }
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
            found.push(m);
        }
        found.sort_by_key(|m| (m.a, m.b));

        let mut blocks: Vec<Match> = Vec::with_capacity(found.len() + 1);
        for m in found {
            match blocks.last_mut() {
                Some(last) if last.a + last.size == m.a && last.b + last.size == m.b => {
                    last.size += m.size;
                }
                _ => blocks.push(m),
            }
        }
        blocks.push(Match {
            a: self.a.len(),
            b: self.b.len(),
            size: 0,
        });
        blocks
    }

    /// Total number of matched tokens
    pub fn matched(&self) -> usize {
        self.matching_blocks().iter().map(|m| m.size).sum()
    }

    /// `2 * matched / (len(a) + len(b))`, 1.0 for identical sequences
    /// (including two empty ones)
    pub fn ratio(&self) -> f64 {
        if self.a == self.b {
            return 1.0;
        }
        let total = self.a.len() + self.b.len();
        (2 * self.matched()) as f64 / total as f64
    }

    /// Edit script from `a` to `b`.
    pub fn opcodes(&self) -> Vec<Opcode> {
        let mut codes = Vec::new();
        let (mut i, mut j) = (0, 0);
        for m in self.matching_blocks() {
            let tag = match (i < m.a, j < m.b) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                codes.push(Opcode {
                    tag,
                    a_start: i,
                    a_end: m.a,
                    b_start: j,
                    b_end: m.b,
                });
            }
            i = m.a + m.size;
            j = m.b + m.size;
            if m.size > 0 {
                codes.push(Opcode {
                    tag: OpTag::Equal,
                    a_start: m.a,
                    a_end: i,
                    b_start: m.b,
                    b_end: j,
                });
            }
        }
        codes
    }

    /// Opcodes clustered into hunks with at most `context` equal tokens
    /// around each change.
    pub fn grouped_opcodes(&self, context: usize) -> Vec<Vec<Opcode>> {
        let mut codes = self.opcodes();
        if codes.is_empty() {
            codes.push(Opcode {
                tag: OpTag::Equal,
                a_start: 0,
                a_end: 1,
                b_start: 0,
                b_end: 1,
            });
        }
        if let Some(first) = codes.first_mut() {
            if first.tag == OpTag::Equal {
                first.a_start = first.a_start.max(first.a_end.saturating_sub(context));
                first.b_start = first.b_start.max(first.b_end.saturating_sub(context));
            }
        }
        if let Some(last) = codes.last_mut() {
            if last.tag == OpTag::Equal {
                last.a_end = last.a_end.min(last.a_start + context);
                last.b_end = last.b_end.min(last.b_start + context);
            }
        }

        let mut groups = Vec::new();
        let mut group = Vec::new();
        for mut code in codes {
            if code.tag == OpTag::Equal && code.a_end - code.a_start > 2 * context {
                group.push(Opcode {
                    a_end: code.a_end.min(code.a_start + context),
                    b_end: code.b_end.min(code.b_start + context),
                    ..code
                });
                groups.push(std::mem::take(&mut group));
                code.a_start = code.a_start.max(code.a_end.saturating_sub(context));
                code.b_start = code.b_start.max(code.b_end.saturating_sub(context));
            }
            group.push(code);
        }
        let only_equal = group.len() == 1 && group[0].tag == OpTag::Equal;
        if !group.is_empty() && !only_equal {
            groups.push(group);
        }
        groups
    }
}

/// Similarity of two texts at the default (word) granularity.
///
/// Always in [0, 1]; exactly 1.0 for identical input, including two empty
/// strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    similarity_with(a, b, Granularity::default())
}

/// Similarity of two texts at an explicit granularity.
pub fn similarity_with(a: &str, b: &str, granularity: Granularity) -> f64 {
    match granularity {
        Granularity::Words => {
            let a: Vec<&str> = a.split_whitespace().collect();
            let b: Vec<&str> = b.split_whitespace().collect();
            symmetric_ratio(&a, &b, true)
        }
        Granularity::Chars => {
            let a: Vec<char> = a.chars().collect();
            let b: Vec<char> = b.chars().collect();
            symmetric_ratio(&a, &b, false)
        }
    }
}

/// Block selection depends on argument order when several longest blocks
/// tie, so score the pair in a fixed order.
fn symmetric_ratio<T: Eq + Hash + Ord>(a: &[T], b: &[T], skip_popular: bool) -> f64 {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    SequenceMatcher::build(first, second, skip_popular).ratio()
}
