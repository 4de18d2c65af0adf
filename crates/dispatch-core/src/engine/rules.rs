//! Business-rule pipeline over the ranked candidate list.
//!
//! Rules run in a fixed order. Each one inspects the current top pick and the
//! full ordered list; it may promote an alternative, annotate reasoning, or
//! short-circuit the whole decision to human review. The ranked list itself
//! never changes — only the index of the pick moves.

use crate::config::EngineConfig;
use crate::domain::{
    ReviewAction, ReviewReason, ReviewTrigger, Ticket, TriggerSeverity,
};
use crate::engine::candidate::Candidate;

pub const RULE_OVERLOAD_PREVENTION: &str = "overload_prevention";
pub const RULE_TIMEZONE_VS_EXPERTISE: &str = "timezone_vs_expertise";
pub const RULE_FAIR_DISTRIBUTION: &str = "fair_distribution";
pub const RULE_SKILLS_GAP: &str = "skills_gap";
pub const RULE_TEAM_LEAD_NOTIFICATION: &str = "team_lead_notification";

// ============================================================================
// RULE STATE
// ============================================================================

/// Mutable cursor over an immutable ranking, accumulated annotations
/// included. The final decision reflects every rule that fired, in order.
#[derive(Debug)]
pub struct RuleState {
    pub ranked: Vec<Candidate>,
    pub top: usize,
    pub applied_rules: Vec<String>,
    pub reasoning: Vec<String>,
}

impl RuleState {
    pub fn new(ranked: Vec<Candidate>) -> Self {
        Self {
            ranked,
            top: 0,
            applied_rules: Vec::new(),
            reasoning: Vec::new(),
        }
    }

    pub fn top(&self) -> &Candidate {
        &self.ranked[self.top]
    }

    fn promote(&mut self, index: usize, rule: &str, note: String) {
        self.top = index;
        self.applied_rules.push(rule.to_string());
        self.reasoning.push(note);
    }

    fn annotate(&mut self, rule: &str, note: String) {
        self.applied_rules.push(rule.to_string());
        self.reasoning.push(note);
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Run rules 1–4. Returns a trigger when the decision must short-circuit to
/// human review; otherwise the state carries the (possibly rewritten) pick.
pub fn run_rules(
    state: &mut RuleState,
    ticket: &Ticket,
    config: &EngineConfig,
) -> Option<ReviewTrigger> {
    if let Some(trigger) = overload_prevention(state, config) {
        return Some(trigger);
    }
    timezone_vs_expertise(state, config);
    fair_distribution(state, config);
    skills_gap(state, ticket, config);
    None
}

// ============================================================================
// RULE 1: OVERLOAD PREVENTION
// ============================================================================

/// Never hand a ticket to someone already saturated. Falls through the
/// ranking for the first healthy alternative; if the whole team is at
/// capacity the decision escalates immediately.
fn overload_prevention(state: &mut RuleState, config: &EngineConfig) -> Option<ReviewTrigger> {
    let top = state.top();
    // The floor is inclusive: a workload score of exactly 0.3 still fires.
    if !top.is_overloaded && top.scores.workload > config.overload_score_floor {
        return None;
    }

    let blocked_email = top.member.email.clone();
    let blocked_load = top.weighted_load;

    let alternative = state.ranked.iter().enumerate().find(|(index, candidate)| {
        *index != state.top
            && !candidate.is_overloaded
            && candidate.scores.availability == 1.0
            && candidate.scores.workload >= config.overload_alt_floor
    });

    match alternative {
        Some((index, candidate)) => {
            let note = format!(
                "overload prevention: {} is saturated (weighted load {:.1}); reassigned to {} (load {:.1})",
                blocked_email, blocked_load, candidate.member.email, candidate.weighted_load
            );
            state.promote(index, RULE_OVERLOAD_PREVENTION, note);
            None
        }
        None => Some(ReviewTrigger {
            reason: ReviewReason::TeamAtCapacity,
            severity: TriggerSeverity::Critical,
            action: ReviewAction::ImmediateManagerEscalation,
            timeout_minutes: None,
            message: format!(
                "best candidate {} carries weighted load {:.1} and no member has both availability and spare capacity",
                blocked_email, blocked_load
            ),
        }),
    }
}

// ============================================================================
// RULE 2: TIMEZONE VS EXPERTISE
// ============================================================================

/// A strong expert outside the preferred timezone keeps the ticket only when
/// materially ahead of the best in-timezone alternative.
fn timezone_vs_expertise(state: &mut RuleState, config: &EngineConfig) {
    let top = state.top();
    if top.scores.timezone >= 1.0 || top.scores.similarity <= 0.8 {
        return;
    }

    let Some((index, alt)) = state
        .ranked
        .iter()
        .enumerate()
        .find(|(index, candidate)| *index != state.top && candidate.scores.timezone >= 1.0)
    else {
        // Nobody is in the preferred timezone; the expert keeps the ticket.
        return;
    };

    let gap = top.composite - alt.composite;
    if gap > config.tz_expertise_gap {
        let note = format!(
            "cross-timezone assignment: expert {} stays {:.2} composite ahead of in-timezone {}",
            top.member.email, gap, alt.member.email
        );
        state.annotate(RULE_TIMEZONE_VS_EXPERTISE, note);
    } else {
        let note = format!(
            "in-timezone {} preferred over remote expert {} (composite gap {:.2} within {:.2})",
            alt.member.email, top.member.email, gap, config.tz_expertise_gap
        );
        state.promote(index, RULE_TIMEZONE_VS_EXPERTISE, note);
    }
}

// ============================================================================
// RULE 3: FAIR DISTRIBUTION
// ============================================================================

/// Spread assignments when the pick already took more than their share.
/// Recent-assignment count is the intended metric; the active-ticket cap is
/// kept as a proxy for stores that cannot attribute assignment timestamps.
/// Only positions 2–5 of the ranking are considered as replacements.
fn fair_distribution(state: &mut RuleState, config: &EngineConfig) {
    let top = state.top();
    let over_recent = top.recent_assignments_count >= config.fair_distribution_recent_cap;
    let over_active = top.active_tickets_count >= config.fair_distribution_cap;
    if !over_recent && !over_active {
        return;
    }

    let crowded_email = top.member.email.clone();
    let limit = state.ranked.len().min(5);
    let alternative = (1..limit).find(|&index| {
        let candidate = &state.ranked[index];
        index != state.top
            && candidate.active_tickets_count < config.fair_distribution_cap
            && candidate.recent_assignments_count < config.fair_distribution_recent_cap
            && candidate.scores.availability == 1.0
    });

    if let Some(index) = alternative {
        let alt_email = state.ranked[index].member.email.clone();
        let note = format!(
            "fair distribution: {} already holds the lion's share; routed to {}",
            crowded_email, alt_email
        );
        state.promote(index, RULE_FAIR_DISTRIBUTION, note);
    }
}

// ============================================================================
// RULE 4: SKILLS GAP
// ============================================================================

/// Annotation only: flags a thin skill match so a reviewer can pair the
/// assignee up. Never moves the ticket.
fn skills_gap(state: &mut RuleState, ticket: &Ticket, config: &EngineConfig) {
    let top = state.top();
    if top.scores.skill >= config.skills_gap_floor {
        return;
    }
    let note = format!(
        "skills gap: {} scores {:.2} on category '{}'; consider pairing or a follow-up training note",
        top.member.email, top.scores.skill, ticket.category
    );
    state.annotate(RULE_SKILLS_GAP, note);
}

// ============================================================================
// TESTS
// ============================================================================
