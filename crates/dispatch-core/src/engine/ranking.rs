use std::cmp::Ordering;

use crate::engine::candidate::Candidate;

/// Total order over candidates: composite descending, then email ascending.
///
/// The email tie-break makes the ranking deterministic for identical
/// snapshots; downstream rules reference positions in this list.
pub fn rank_candidates(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        match b.composite.total_cmp(&a.composite) {
            Ordering::Equal => a.member.email.cmp(&b.member.email),
            ordering => ordering,
        }
    });
    candidates
}

// ============================================================================
// TESTS
// ============================================================================
