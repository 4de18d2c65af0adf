//! Component scores for candidate evaluation.
//!
//! Five independent scores per member — similarity, skill, availability,
//! workload, timezone — and their priority-weighted composite. Everything in
//! this module is pure: the only clock is the `now_utc` captured at call
//! entry and threaded through.

use chrono::{DateTime, Timelike, Utc};

use crate::config::{ComponentWeights, EngineConfig};
use crate::domain::{
    ActiveTicket, Member, Region, SimilarTicket, Ticket, TicketPriority, TicketStatus,
};
use crate::engine::snapshot::TeamSnapshot;

// ============================================================================
// SIMILARITY
// ============================================================================

/// Logarithmic expertise factor over the number of similar tickets a member
/// resolved.
///
/// `log(solved + 1) / log(6)`, clamped to 1.0: one match gives 0.387, three
/// give 0.774, five saturate at 1.0. The log curve keeps frequent resolvers
/// from turning into ticket magnets.
pub fn expertise_factor(solved_count: usize) -> f64 {
    if solved_count == 0 {
        return 0.0;
    }
    (((solved_count + 1) as f64).ln() / 6.0_f64.ln()).min(1.0)
}

/// Similarity score for one member against the similar-ticket list.
///
/// # Returns
/// * `(score, solved_count)` where score = expertise factor × mean similarity
///   of the member's matching entries, clamped to [0, 1]. Zero matches score
///   0.0.
pub fn similarity_score(member_email: &str, similar: &[SimilarTicket]) -> (f64, usize) {
    let mut matched: Vec<f64> = similar
        .iter()
        .filter(|entry| entry.assignee_email.eq_ignore_ascii_case(member_email))
        .map(|entry| entry.similarity)
        .collect();

    if matched.is_empty() {
        return (0.0, 0);
    }

    // Summation order must not leak into the decision: permuting the input
    // list has to yield a byte-identical mean.
    matched.sort_by(f64::total_cmp);
    let avg = matched.iter().sum::<f64>() / matched.len() as f64;
    let score = (expertise_factor(matched.len()) * avg).clamp(0.0, 1.0);
    (score, matched.len())
}

// ============================================================================
// SKILL
// ============================================================================

/// Floor returned when nothing in the member's tags relates to the category.
/// Never 0.0: a zero here would misread "no tag data" as a hard skills gap.
const SKILL_BASELINE: f64 = 0.2;
const SKILL_EXACT: f64 = 0.9;
const SKILL_PARTIAL: f64 = 0.6;

fn skill_tokens(tag: &str) -> impl Iterator<Item = &str> {
    tag.split(['-', '_', '/', ' ', '.'])
        .filter(|token| !token.is_empty())
}

/// Match the ticket category against the member's skill tags.
///
/// Exact tag match scores 0.9, token-level overlap ("database-performance"
/// vs "database") scores 0.6, anything else the 0.2 baseline. Output is
/// always in [0, 1].
pub fn skill_match_score(category: &str, skills: &[String]) -> f64 {
    let category = category.trim();
    if category.is_empty() || skills.is_empty() {
        return SKILL_BASELINE;
    }

    if skills.iter().any(|tag| tag.eq_ignore_ascii_case(category)) {
        return SKILL_EXACT;
    }

    let category_lower = category.to_ascii_lowercase();
    let wanted: Vec<&str> = skill_tokens(&category_lower).collect();
    let overlaps = skills.iter().any(|tag| {
        let tag_lower = tag.to_ascii_lowercase();
        let tag_tokens: Vec<&str> = skill_tokens(&tag_lower).collect();
        tag_tokens.iter().any(|token| wanted.contains(token))
    });

    if overlaps {
        SKILL_PARTIAL
    } else {
        SKILL_BASELINE
    }
}

// ============================================================================
// AVAILABILITY
// ============================================================================

/// Strictly binary gate: 1.0 iff the member has no active leave and no
/// regional or global holiday today.
pub fn availability_score(member: &Member, snapshot: &TeamSnapshot) -> f64 {
    if snapshot.is_available(member) {
        1.0
    } else {
        0.0
    }
}

// ============================================================================
// WORKLOAD
// ============================================================================

fn priority_weight(priority: TicketPriority) -> f64 {
    match priority {
        TicketPriority::Critical => 3.0,
        TicketPriority::High => 2.0,
        TicketPriority::Medium => 1.0,
        TicketPriority::Low => 0.5,
    }
}

fn age_multiplier(age_days: i64) -> f64 {
    if age_days > 7 {
        1.5
    } else if age_days > 3 {
        1.2
    } else {
        1.0
    }
}

fn status_weight(status: TicketStatus) -> f64 {
    match status {
        TicketStatus::InProgress => 1.0,
        TicketStatus::Open => 0.5,
        TicketStatus::Blocked => 0.3,
        TicketStatus::Pending => 0.5,
    }
}

/// Contextual load: each active ticket contributes
/// `priority_weight × age_multiplier × status_weight`. Stale critical work
/// in progress weighs an order of magnitude more than a fresh low-priority
/// ticket sitting open.
pub fn weighted_load(tickets: &[ActiveTicket], now_utc: DateTime<Utc>) -> f64 {
    tickets
        .iter()
        .map(|ticket| {
            let age_days = (now_utc - ticket.created_at).num_days();
            priority_weight(ticket.priority) * age_multiplier(age_days) * status_weight(ticket.status)
        })
        .sum()
}

/// `max(0, 1 − load / capacity)`.
pub fn workload_score(load: f64, capacity: f64) -> f64 {
    (1.0 - load / capacity).max(0.0)
}

// ============================================================================
// TIMEZONE
// ============================================================================

/// Whether `now_utc` falls inside the half-open `[start, end)` IST window,
/// compared on UTC hour-with-fraction.
pub fn in_ist_window(now_utc: DateTime<Utc>, window: (f64, f64)) -> bool {
    let hour = f64::from(now_utc.hour()) + f64::from(now_utc.minute()) / 60.0;
    window.0 <= hour && hour < window.1
}

/// Region preferred at this instant: India during the IST window, the US
/// otherwise.
pub fn preferred_region(now_utc: DateTime<Utc>, config: &EngineConfig) -> Region {
    if in_ist_window(now_utc, config.ist_window_utc) {
        Region::India
    } else {
        Region::UnitedStates
    }
}

/// Timezone fit with a deliberate non-zero floor.
///
/// A member in the preferred region scores 1.0. Outside it the floor is 0.2,
/// lifted to 0.5 for critical tickets and to 0.6 for experts on this
/// pattern — hard exclusion by geography would be too rigid.
pub fn timezone_score(
    member_region: Region,
    now_utc: DateTime<Utc>,
    priority: TicketPriority,
    solved_similar_count: usize,
    config: &EngineConfig,
) -> f64 {
    if member_region == preferred_region(now_utc, config) {
        return 1.0;
    }
    if priority == TicketPriority::Critical {
        config.tz_boost_critical
    } else if solved_similar_count >= config.expert_solved_count {
        config.tz_boost_expert
    } else {
        config.tz_mismatch_floor
    }
}

// ============================================================================
// COMPOSITE
// ============================================================================

/// Component scores for one candidate, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentScores {
    pub similarity: f64,
    pub skill: f64,
    pub availability: f64,
    pub workload: f64,
    pub timezone: f64,
}

/// Priority-weighted sum. Weight rows sum to 1.0 and every component sits in
/// [0, 1], so the composite does too.
pub fn composite_score(scores: &ComponentScores, weights: &ComponentWeights) -> f64 {
    scores.similarity * weights.similarity
        + scores.skill * weights.skill
        + scores.availability * weights.availability
        + scores.workload * weights.workload
        + scores.timezone * weights.timezone
}

/// Convenience used by the candidate builder.
pub fn score_components(
    member: &Member,
    ticket: &Ticket,
    similar: &[SimilarTicket],
    snapshot: &TeamSnapshot,
    config: &EngineConfig,
) -> (ComponentScores, usize, f64) {
    let (similarity, solved_count) = similarity_score(&member.email, similar);
    let skill = skill_match_score(&ticket.category, &member.skills);
    let availability = availability_score(member, snapshot);
    let load = weighted_load(snapshot.active_tickets_for(member.id), snapshot.now_utc);
    let workload = workload_score(load, config.workload_capacity);
    let timezone = timezone_score(
        member.region(),
        snapshot.now_utc,
        ticket.priority,
        solved_count,
        config,
    );

    (
        ComponentScores {
            similarity,
            skill,
            availability,
            workload,
            timezone,
        },
        solved_count,
        load,
    )
}

// ============================================================================
// TESTS
// ============================================================================
