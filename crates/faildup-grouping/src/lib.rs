//! Threshold grouping of test failures by message similarity.
//!
//! 1. Score every distinct pair of failure messages (TF-IDF + cosine)
//! 2. Link each pair whose score meets the threshold (or whose text is
//!    identical) in a disjoint-set forest
//! 3. Read off connected components as groups, numbered by first member
//! 4. Emit entries: every failure, or one representative per group (drain)
//!
//! Grouping is the transitive closure of the "similar enough" relation: two
//! failures share a group when a chain of direct links connects them, even if
//! their own pairwise score is below the threshold.

use std::collections::BTreeMap;

use faildup_math::{round_f64, safe_ratio};
use faildup_similarity::{message_pairs, pair_indices, score_pairs, tokenize};
use faildup_types::{FailureGroup, FailureSet, GroupReport, GroupedFailure, Outcome};

// ---------------------------------------------------------------------------
// Union-Find (Disjoint Sets) for grouping
// ---------------------------------------------------------------------------

/// Path-compressed union-find with union by rank.
#[derive(Debug, Clone)]
pub struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl DisjointSets {
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    pub fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Stable 16-hex-digit digest of a message's token stream.
///
/// Messages that differ only in whitespace, punctuation, or case share a
/// signature.
pub fn signature(message: &str) -> String {
    let normalized = tokenize(message).join(" ");
    let mut hex = blake3::hash(normalized.as_bytes()).to_hex().to_string();
    hex.truncate(16);
    hex
}

/// Partition `messages` into similarity groups.
///
/// Groups are numbered from 1 in order of their lowest member index; members
/// are ascending and the first member is the representative.
///
/// Byte-identical messages always link, even when they have no tokens. At a
/// threshold of 1.0 nothing else does: messages that differ only in case or
/// in dropped single-character tokens share a vector and score 1.0, but are
/// not the same failure text.
pub fn group_failures<S: AsRef<str>>(messages: &[S], threshold: f64) -> Vec<FailureGroup> {
    let n = messages.len();
    let pairs = pair_indices(n);
    let scores = score_pairs(&message_pairs(messages));
    debug_assert_eq!(pairs.len(), scores.len());

    let mut ds = DisjointSets::new(n);
    let mut links: Vec<(usize, f64)> = Vec::new();
    for (&(a, b), &score) in pairs.iter().zip(scores.iter()) {
        if messages[a].as_ref() == messages[b].as_ref() {
            ds.union(a, b);
            links.push((a, 1.0));
        } else if score >= threshold && threshold < 1.0 {
            ds.union(a, b);
            links.push((a, score));
        }
    }

    // Max link score per component, keyed by root
    let mut max_sim: BTreeMap<usize, f64> = BTreeMap::new();
    for (a, score) in links {
        let root = ds.find(a);
        let entry = max_sim.entry(root).or_insert(0.0);
        if score > *entry {
            *entry = score;
        }
    }

    // Components in order of first member
    let mut slot_of_root: BTreeMap<usize, usize> = BTreeMap::new();
    let mut components: Vec<(usize, Vec<usize>)> = Vec::new();
    for i in 0..n {
        let root = ds.find(i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            components.push((root, Vec::new()));
            components.len() - 1
        });
        components[slot].1.push(i);
    }

    components
        .into_iter()
        .enumerate()
        .map(|(k, (root, members))| {
            let representative = members[0];
            FailureGroup {
                id: k + 1,
                representative,
                size: members.len(),
                max_similarity: round_f64(max_sim.get(&root).copied().unwrap_or(0.0), 4),
                signature: signature(messages[representative].as_ref()),
                members,
            }
        })
        .collect()
}

/// Verify that `groups` partition the indices `0..n`.
///
/// A failure here is a programming defect, never a user error.
pub fn check_partition(groups: &[FailureGroup], n: usize) -> Result<(), String> {
    if n > 0 && groups.is_empty() {
        return Err(format!("{n} failures produced no groups"));
    }
    let mut seen = vec![false; n];
    for (k, group) in groups.iter().enumerate() {
        if group.id != k + 1 {
            return Err(format!("group at position {k} has id {}", group.id));
        }
        if group.members.is_empty() {
            return Err(format!("group {} is empty", group.id));
        }
        if group.size != group.members.len() {
            return Err(format!(
                "group {} reports size {} but has {} members",
                group.id,
                group.size,
                group.members.len()
            ));
        }
        if group.representative != group.members[0] {
            return Err(format!(
                "group {} representative {} is not its first member",
                group.id, group.representative
            ));
        }
        for &m in &group.members {
            match seen.get_mut(m) {
                None => return Err(format!("group {} has out-of-range member {m}", group.id)),
                Some(true) => return Err(format!("failure {m} belongs to more than one group")),
                Some(slot) => *slot = true,
            }
        }
    }
    if let Some(missing) = seen.iter().position(|s| !s) {
        return Err(format!("failure {missing} belongs to no group"));
    }
    Ok(())
}

/// Group `failures` and build the report entries.
///
/// An empty set yields [`Outcome::NoFailures`]. With `drain`, only each
/// group's representative is emitted; otherwise every failure is, ordered by
/// group and then by original position.
pub fn analyze_failures(failures: &FailureSet, threshold: f64, drain: bool) -> Outcome {
    let n = failures.len();
    if n == 0 {
        return Outcome::NoFailures;
    }

    let groups = group_failures(failures.messages(), threshold);
    debug_assert_eq!(check_partition(&groups, n), Ok(()));

    let entries: Vec<GroupedFailure> = groups
        .iter()
        .flat_map(|g| {
            let shown: &[usize] = if drain {
                &g.members[..1]
            } else {
                &g.members
            };
            shown.iter().filter_map(move |&index| {
                failures.record(index).map(|record| GroupedFailure {
                    group: g.id,
                    index,
                    record,
                })
            })
        })
        .collect();

    Outcome::Report(GroupReport {
        threshold,
        drain,
        total_failures: n,
        duplicate_ratio: safe_ratio(n - groups.len(), n),
        groups,
        entries,
    })
}
