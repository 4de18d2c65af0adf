//! Immutable engine configuration: thresholds, boosts, and the per-priority
//! weight tables. Validated once at engine construction; never mutated after.

use serde::{Deserialize, Serialize};

use crate::domain::{EngineError, TicketPriority};

// ============================================================================
// COMPONENT WEIGHTS
// ============================================================================

/// One row of the weight table. Rows must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub similarity: f64,
    pub skill: f64,
    pub availability: f64,
    pub workload: f64,
    pub timezone: f64,
}

impl ComponentWeights {
    pub fn sum(&self) -> f64 {
        self.similarity + self.skill + self.availability + self.workload + self.timezone
    }
}

/// Per-priority weight rows. Critical tickets lean on similarity and
/// timezone; low-priority tickets mostly follow free capacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    pub critical: ComponentWeights,
    pub high: ComponentWeights,
    pub medium: ComponentWeights,
    pub low: ComponentWeights,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            critical: ComponentWeights {
                similarity: 0.30,
                skill: 0.25,
                availability: 0.15,
                workload: 0.10,
                timezone: 0.20,
            },
            high: ComponentWeights {
                similarity: 0.25,
                skill: 0.25,
                availability: 0.20,
                workload: 0.15,
                timezone: 0.15,
            },
            medium: ComponentWeights {
                similarity: 0.20,
                skill: 0.25,
                availability: 0.20,
                workload: 0.20,
                timezone: 0.15,
            },
            low: ComponentWeights {
                similarity: 0.15,
                skill: 0.15,
                availability: 0.15,
                workload: 0.40,
                timezone: 0.15,
            },
        }
    }
}

impl WeightTable {
    pub fn for_priority(&self, priority: TicketPriority) -> &ComponentWeights {
        match priority {
            TicketPriority::Critical => &self.critical,
            TicketPriority::High => &self.high,
            TicketPriority::Medium => &self.medium,
            TicketPriority::Low => &self.low,
        }
    }
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Role tag members must carry to be considered.
    pub member_role: String,
    /// Pre-rule threshold: below this max similarity the engine escalates.
    pub similarity_floor: f64,
    /// Below this confidence the decision goes to human review.
    pub confidence_low: f64,
    /// Below this confidence (and at or above `confidence_low`) the team lead
    /// is notified alongside the assignment.
    pub confidence_medium: f64,
    /// Normalization denominator for the workload score.
    pub workload_capacity: f64,
    /// `is_overloaded` boundary on the weighted load.
    pub overload_threshold: f64,
    /// `[start, end)` UTC hours-with-fraction during which India is preferred.
    pub ist_window_utc: (f64, f64),
    /// Timezone score for a member outside the preferred region.
    pub tz_mismatch_floor: f64,
    /// Timezone override for critical tickets.
    pub tz_boost_critical: f64,
    /// Timezone override for experts on the ticket's pattern.
    pub tz_boost_expert: f64,
    /// Solved-similar count at which a member counts as an expert.
    pub expert_solved_count: usize,
    /// Rule 1 fires at or below this workload score.
    pub overload_score_floor: f64,
    /// Rule 1 replacement must be at or above this workload score.
    pub overload_alt_floor: f64,
    /// Rule 2 keeps the cross-timezone expert above this composite gap.
    pub tz_expertise_gap: f64,
    /// Rule 3 active-ticket cap (proxy metric).
    pub fair_distribution_cap: usize,
    /// Rule 3 recent-assignment cap (preferred metric).
    pub fair_distribution_recent_cap: u32,
    /// Rule 4 annotates below this skill score.
    pub skills_gap_floor: f64,
    /// Recent-assignment lookback window in days.
    pub recent_window_days: u32,
    pub weights: WeightTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            member_role: "USER".to_string(),
            similarity_floor: 0.70,
            confidence_low: 0.30,
            confidence_medium: 0.50,
            workload_capacity: 30.0,
            overload_threshold: 20.0,
            ist_window_utc: (2.5, 12.5),
            tz_mismatch_floor: 0.2,
            tz_boost_critical: 0.5,
            tz_boost_expert: 0.6,
            expert_solved_count: 3,
            overload_score_floor: 0.3,
            overload_alt_floor: 0.5,
            tz_expertise_gap: 0.15,
            fair_distribution_cap: 8,
            fair_distribution_recent_cap: 5,
            skills_gap_floor: 0.4,
            recent_window_days: 7,
            weights: WeightTable::default(),
        }
    }
}

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

impl EngineConfig {
    pub fn weights_for(&self, priority: TicketPriority) -> &ComponentWeights {
        self.weights.for_priority(priority)
    }

    /// Check every structural invariant. Run once at engine construction; a
    /// failure here is fatal, never worked around.
    pub fn validate(&self) -> Result<(), EngineError> {
        let rows = [
            (TicketPriority::Critical, &self.weights.critical),
            (TicketPriority::High, &self.weights.high),
            (TicketPriority::Medium, &self.weights.medium),
            (TicketPriority::Low, &self.weights.low),
        ];
        for (priority, row) in rows {
            if (row.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(EngineError::InvariantViolation(format!(
                    "weight row for {} sums to {}, expected 1.0",
                    priority.as_str(),
                    row.sum()
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.confidence_low)
            || !(0.0..=1.0).contains(&self.confidence_medium)
            || self.confidence_low >= self.confidence_medium
        {
            return Err(EngineError::InvariantViolation(format!(
                "confidence thresholds must satisfy 0 <= low < medium <= 1, got {} / {}",
                self.confidence_low, self.confidence_medium
            )));
        }

        if self.workload_capacity <= 0.0 {
            return Err(EngineError::InvariantViolation(format!(
                "workload capacity must be positive, got {}",
                self.workload_capacity
            )));
        }

        let (start, end) = self.ist_window_utc;
        if !(0.0..24.0).contains(&start) || !(start..=24.0).contains(&end) {
            return Err(EngineError::InvariantViolation(format!(
                "IST window [{start}, {end}) is not a valid UTC hour range"
            )));
        }

        if self.recent_window_days == 0 {
            return Err(EngineError::InvariantViolation(
                "recent-assignment window must be at least one day".into(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
