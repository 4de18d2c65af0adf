//! Confidence gate over the final pick.
//!
//! Five booleans, each worth a fifth of the confidence score, routed into
//! three channels: auto-assign, assign-with-notification, human review.

use crate::config::EngineConfig;
use crate::engine::candidate::Candidate;

/// Composite separation the pick must hold over the runner-up.
const MARGIN_FLOOR: f64 = 0.01;

// ============================================================================
// FACTORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfidenceFactors {
    pub strong_similarity: bool,
    pub skill_coverage: bool,
    pub available: bool,
    pub clear_margin: bool,
    pub timezone_floor: bool,
}

impl ConfidenceFactors {
    pub fn satisfied(&self) -> usize {
        [
            self.strong_similarity,
            self.skill_coverage,
            self.available,
            self.clear_margin,
            self.timezone_floor,
        ]
        .iter()
        .filter(|&&factor| factor)
        .count()
    }
}

/// Evaluate the five factors on the pick at `top` within the ranking.
///
/// The runner-up is the best composite among everyone else; when a rule
/// demoted the original leader, that leader is the runner-up and the margin
/// factor records how contested the rewrite was. A lone candidate has no
/// competition and the margin counts as satisfied.
pub fn evaluate_confidence(ranked: &[Candidate], top: usize) -> (f64, ConfidenceFactors) {
    let pick = &ranked[top];
    let runner_up = ranked
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != top)
        .map(|(_, candidate)| candidate.composite)
        .max_by(f64::total_cmp);

    let factors = ConfidenceFactors {
        strong_similarity: pick.scores.similarity > 0.75,
        skill_coverage: pick.scores.skill > 0.15,
        available: pick.scores.availability > 0.7,
        clear_margin: runner_up
            .map(|second| pick.composite - second > MARGIN_FLOOR)
            .unwrap_or(true),
        timezone_floor: pick.scores.timezone >= 0.2,
    };

    (factors.satisfied() as f64 / 5.0, factors)
}

// ============================================================================
// ROUTING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    /// Below the low threshold: no assignee, a human decides.
    HumanReview,
    /// Between the thresholds: assign, but notify the team lead.
    AssignWithNotification,
    /// At or above the medium threshold: assign silently.
    AutoAssign,
}

pub fn band_for(confidence: f64, config: &EngineConfig) -> ConfidenceBand {
    if confidence < config.confidence_low {
        ConfidenceBand::HumanReview
    } else if confidence < config.confidence_medium {
        ConfidenceBand::AssignWithNotification
    } else {
        ConfidenceBand::AutoAssign
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scoring::ComponentScores;
    use crate::testing::fixtures::member;

    fn candidate(email: &str, composite: f64, scores: ComponentScores) -> Candidate {
        Candidate {
            member: member(1, email, email, "Asia/Kolkata", &[]),
            scores,
            composite,
            weighted_load: 0.0,
            is_overloaded: false,
            active_tickets_count: 0,
            recent_assignments_count: 0,
            solved_similar_count: 0,
        }
    }

    fn strong_scores() -> ComponentScores {
        ComponentScores {
            similarity: 0.9,
            skill: 0.9,
            availability: 1.0,
            workload: 1.0,
            timezone: 1.0,
        }
    }

    #[test]
    fn test_all_factors_satisfied() {
        let ranked = vec![
            candidate("ravi@example.com", 0.9, strong_scores()),
            candidate("priya@example.com", 0.5, strong_scores()),
        ];
        let (confidence, factors) = evaluate_confidence(&ranked, 0);
        assert_eq!(confidence, 1.0);
        assert_eq!(factors.satisfied(), 5);
    }

    #[test]
    fn test_demoted_leader_breaks_the_margin() {
        // The pick sits at position 1; position 0 is the demoted leader.
        let ranked = vec![
            candidate("ravi@example.com", 0.9, strong_scores()),
            candidate("sneha@example.com", 0.7, strong_scores()),
        ];
        let (confidence, factors) = evaluate_confidence(&ranked, 1);
        assert!(!factors.clear_margin);
        assert_eq!(confidence, 0.8);
    }

    #[test]
    fn test_lone_candidate_margin_counts() {
        let ranked = vec![candidate("ravi@example.com", 0.9, strong_scores())];
        let (_, factors) = evaluate_confidence(&ranked, 0);
        assert!(factors.clear_margin);
    }

    #[test]
    fn test_margin_floor_is_strict() {
        // Gap below the floor (0.0078125, exactly representable): fails
        let ranked = vec![
            candidate("ravi@example.com", 0.75, strong_scores()),
            candidate("priya@example.com", 0.7421875, strong_scores()),
        ];
        let (_, factors) = evaluate_confidence(&ranked, 0);
        assert!(!factors.clear_margin);

        // Tied composites: fails
        let ranked = vec![
            candidate("ravi@example.com", 0.75, strong_scores()),
            candidate("priya@example.com", 0.75, strong_scores()),
        ];
        let (_, factors) = evaluate_confidence(&ranked, 0);
        assert!(!factors.clear_margin);

        // Gap above the floor (0.015625): passes
        let ranked = vec![
            candidate("ravi@example.com", 0.765625, strong_scores()),
            candidate("priya@example.com", 0.75, strong_scores()),
        ];
        let (_, factors) = evaluate_confidence(&ranked, 0);
        assert!(factors.clear_margin);
    }

    #[test]
    fn test_band_boundaries() {
        let config = EngineConfig::default();
        assert_eq!(band_for(0.29, &config), ConfidenceBand::HumanReview);
        assert_eq!(
            band_for(0.30, &config),
            ConfidenceBand::AssignWithNotification,
            "exactly 0.30 notifies, it does not escalate"
        );
        assert_eq!(band_for(0.49, &config), ConfidenceBand::AssignWithNotification);
        assert_eq!(
            band_for(0.50, &config),
            ConfidenceBand::AutoAssign,
            "exactly 0.50 assigns without notification"
        );
        assert_eq!(band_for(1.0, &config), ConfidenceBand::AutoAssign);
    }
}
