//! The assignment pipeline: snapshot → score → rank → rules → confidence.
//!
//! `AssignmentEngine` is a cheap value: immutable configuration plus a shared
//! store handle. One call owns its snapshot and candidate list end to end, so
//! any number of calls may run concurrently. Given an identical snapshot and
//! identical inputs the decision is byte-identical — the only clock read is
//! the single `now_utc` captured at entry.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::domain::{
    AssignmentType, Decision, EngineError, ReviewAction, ReviewReason, ReviewTrigger,
    SimilarTicket, Ticket, TriggerSeverity,
};
use crate::engine::candidate::{evaluate_member, Candidate};
use crate::engine::confidence::{band_for, evaluate_confidence, ConfidenceBand};
use crate::engine::ranking::rank_candidates;
use crate::engine::rules::{run_rules, RuleState, RULE_TEAM_LEAD_NOTIFICATION};
use crate::engine::snapshot::load_snapshot;
use crate::ports::TeamStore;

const NO_SIMILAR_PATTERN_TIMEOUT_MIN: u32 = 60;
const LOW_CONFIDENCE_TIMEOUT_MIN: u32 = 15;

// ============================================================================
// ENGINE
// ============================================================================

pub struct AssignmentEngine {
    store: Arc<dyn TeamStore>,
    config: EngineConfig,
}

impl std::fmt::Debug for AssignmentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssignmentEngine")
            .field("config", &self.config)
            .finish()
    }
}

impl AssignmentEngine {
    /// Build an engine over a shared store handle. The configuration is
    /// validated here and immutable afterwards.
    pub fn new(store: Arc<dyn TeamStore>, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Decide who should own `ticket`, or escalate to a human.
    ///
    /// Pure with respect to the store: nothing is written, and the snapshot
    /// is read in a bounded number of queries.
    pub async fn assign_ticket(
        &self,
        ticket: &Ticket,
        similar_tickets: &[SimilarTicket],
    ) -> Result<Decision, EngineError> {
        self.assign_ticket_at(ticket, similar_tickets, Utc::now())
            .await
    }

    /// Same as [`assign_ticket`](Self::assign_ticket) with an explicit clock,
    /// which is what makes decisions reproducible.
    pub async fn assign_ticket_at(
        &self,
        ticket: &Ticket,
        similar_tickets: &[SimilarTicket],
        now_utc: DateTime<Utc>,
    ) -> Result<Decision, EngineError> {
        ticket.validate()?;
        for entry in similar_tickets {
            entry.validate()?;
        }

        // Pre-rule: without a historical pattern above the floor there is
        // nothing to score against; escalate before touching the store.
        let max_similarity = similar_tickets
            .iter()
            .map(|entry| entry.similarity)
            .fold(0.0, f64::max);
        if similar_tickets.is_empty() || max_similarity < self.config.similarity_floor {
            warn!(
                ticket = %ticket.id,
                max_similarity,
                "no similar pattern above the floor; escalating"
            );
            return Ok(human_review(
                ReviewTrigger {
                    reason: ReviewReason::NoSimilarPattern,
                    severity: TriggerSeverity::High,
                    action: ReviewAction::TeamConsultationEmail,
                    timeout_minutes: Some(NO_SIMILAR_PATTERN_TIMEOUT_MIN),
                    message: format!(
                        "best historical similarity is {max_similarity:.2}, below the {:.2} floor; the team should triage this pattern together",
                        self.config.similarity_floor
                    ),
                },
                Vec::new(),
                Vec::new(),
            ));
        }

        let snapshot = load_snapshot(
            self.store.as_ref(),
            &self.config.member_role,
            self.config.recent_window_days,
            now_utc,
        )
        .await?;

        if snapshot.members.is_empty() {
            return Ok(human_review(
                ReviewTrigger {
                    reason: ReviewReason::NoCandidates,
                    severity: TriggerSeverity::Critical,
                    action: ReviewAction::ImmediateManagerEscalation,
                    timeout_minutes: None,
                    message: format!(
                        "no members with role {:?} were found to evaluate",
                        self.config.member_role
                    ),
                },
                Vec::new(),
                Vec::new(),
            ));
        }

        let candidates: Vec<Candidate> = snapshot
            .members
            .iter()
            .map(|m| evaluate_member(m, ticket, similar_tickets, &snapshot, &self.config))
            .collect();
        let ranked = rank_candidates(candidates);
        debug!(
            ticket = %ticket.id,
            candidates = ranked.len(),
            top = %ranked[0].member.email,
            "candidates ranked"
        );

        // Scoring edge cases resolve to human review, never a crash.
        if ranked.iter().all(|c| c.scores.availability == 0.0) {
            return Ok(human_review(
                ReviewTrigger {
                    reason: ReviewReason::TeamAtCapacity,
                    severity: TriggerSeverity::Critical,
                    action: ReviewAction::ImmediateManagerEscalation,
                    timeout_minutes: None,
                    message: "every member is out today (leave or holiday); nobody can take the ticket".to_string(),
                },
                Vec::new(),
                Vec::new(),
            ));
        }
        if ranked.iter().all(|c| c.solved_similar_count == 0) {
            return Ok(human_review(
                ReviewTrigger {
                    reason: ReviewReason::NoSimilarPattern,
                    severity: TriggerSeverity::High,
                    action: ReviewAction::TeamConsultationEmail,
                    timeout_minutes: Some(NO_SIMILAR_PATTERN_TIMEOUT_MIN),
                    message: "similar tickets exist but none were resolved by a current team member".to_string(),
                },
                Vec::new(),
                Vec::new(),
            ));
        }

        let mut state = RuleState::new(ranked);
        if let Some(trigger) = run_rules(&mut state, ticket, &self.config) {
            warn!(ticket = %ticket.id, reason = ?trigger.reason, "rules escalated to human review");
            return Ok(human_review(trigger, state.applied_rules, state.reasoning));
        }

        let (confidence, factors) = evaluate_confidence(&state.ranked, state.top);
        let pick_email = state.top().member.email.clone();
        let summary = selection_summary(state.top());
        debug!(
            ticket = %ticket.id,
            pick = %pick_email,
            confidence,
            ?factors,
            "confidence evaluated"
        );

        match band_for(confidence, &self.config) {
            ConfidenceBand::HumanReview => {
                warn!(ticket = %ticket.id, confidence, "confidence below floor; escalating");
                Ok(Decision {
                    assignment_type: AssignmentType::HumanReview,
                    primary_assignee: None,
                    confidence,
                    applied_rules: state.applied_rules,
                    reasoning: state.reasoning,
                    review_triggers: vec![ReviewTrigger {
                        reason: ReviewReason::LowConfidenceAssignment,
                        severity: TriggerSeverity::Medium,
                        action: ReviewAction::TeamLeadReview,
                        timeout_minutes: Some(LOW_CONFIDENCE_TIMEOUT_MIN),
                        message: format!(
                            "top pick {} only satisfies {} of 5 confidence factors",
                            pick_email,
                            factors.satisfied()
                        ),
                    }],
                })
            }
            band => {
                let mut applied_rules = state.applied_rules;
                let mut reasoning = state.reasoning;
                reasoning.push(summary);
                if band == ConfidenceBand::AssignWithNotification {
                    applied_rules.push(RULE_TEAM_LEAD_NOTIFICATION.to_string());
                    reasoning.push(format!(
                        "confidence {confidence:.2} sits in the notify band; team lead looped in"
                    ));
                }
                info!(
                    ticket = %ticket.id,
                    assignee = %pick_email,
                    confidence,
                    rules = ?applied_rules,
                    "ticket assigned"
                );
                Ok(Decision {
                    assignment_type: AssignmentType::Normal,
                    primary_assignee: Some(pick_email),
                    confidence,
                    applied_rules,
                    reasoning,
                    review_triggers: Vec::new(),
                })
            }
        }
    }
}

// ============================================================================
// DECISION ASSEMBLY
// ============================================================================

fn human_review(
    trigger: ReviewTrigger,
    applied_rules: Vec<String>,
    mut reasoning: Vec<String>,
) -> Decision {
    reasoning.push(trigger.message.clone());
    Decision {
        assignment_type: AssignmentType::HumanReview,
        primary_assignee: None,
        confidence: 0.0,
        applied_rules,
        reasoning,
        review_triggers: vec![trigger],
    }
}

fn selection_summary(pick: &Candidate) -> String {
    format!(
        "assigned to {}: composite {:.3} (similarity {:.2}, skill {:.2}, availability {:.0}, workload {:.2}, timezone {:.2}; resolved {} similar)",
        pick.member.email,
        pick.composite,
        pick.scores.similarity,
        pick.scores.skill,
        pick.scores.availability,
        pick.scores.workload,
        pick.scores.timezone,
        pick.solved_similar_count
    )
}
