use crate::config::EngineConfig;
use crate::domain::{Member, SimilarTicket, Ticket};
use crate::engine::scoring::{composite_score, score_components, ComponentScores};
use crate::engine::snapshot::TeamSnapshot;

/// One member under evaluation for one decision call. Derived, transient:
/// lives only for the duration of the call.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub member: Member,
    pub scores: ComponentScores,
    pub composite: f64,
    pub weighted_load: f64,
    pub is_overloaded: bool,
    pub active_tickets_count: usize,
    /// Assignments inside the recent window (preferred fairness metric).
    pub recent_assignments_count: u32,
    /// How many of the similar tickets this member resolved.
    pub solved_similar_count: usize,
}

/// Score one member against the ticket under the current snapshot.
pub fn evaluate_member(
    member: &Member,
    ticket: &Ticket,
    similar: &[SimilarTicket],
    snapshot: &TeamSnapshot,
    config: &EngineConfig,
) -> Candidate {
    let (scores, solved_similar_count, weighted_load) =
        score_components(member, ticket, similar, snapshot, config);
    let composite = composite_score(&scores, config.weights_for(ticket.priority));

    Candidate {
        member: member.clone(),
        scores,
        composite,
        weighted_load,
        is_overloaded: weighted_load > config.overload_threshold,
        active_tickets_count: snapshot.active_tickets_for(member.id).len(),
        recent_assignments_count: snapshot.recent_assignments_for(member.id),
        solved_similar_count,
    }
}

// ============================================================================
// TESTS
// ============================================================================
