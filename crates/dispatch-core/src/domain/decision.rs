//! The structured decision record returned by the assignment pipeline.
//!
//! A decision is either a normal assignment carrying a primary assignee, or a
//! human-review escalation carrying at least one trigger. It never leaves the
//! engine in any other shape.

use serde::{Deserialize, Serialize};

// ============================================================================
// ASSIGNMENT TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentType {
    Normal,
    HumanReview,
}

// ============================================================================
// REVIEW TRIGGERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewReason {
    /// No similar ticket cleared the similarity floor, or none of the
    /// historical assignees are on the current team.
    NoSimilarPattern,
    /// Nobody can take the ticket: everyone overloaded, on leave, or holiday.
    TeamAtCapacity,
    /// The final pick cleared the rules but not the confidence gate.
    LowConfidenceAssignment,
    /// The snapshot contained no members to evaluate.
    NoCandidates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    TeamConsultationEmail,
    ImmediateManagerEscalation,
    TeamLeadReview,
}

/// One reason the decision was routed to a human, with the action the
/// surrounding workflow should take and how long it may wait.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewTrigger {
    pub reason: ReviewReason,
    pub severity: TriggerSeverity,
    pub action: ReviewAction,
    pub timeout_minutes: Option<u32>,
    /// Operator-facing explanation.
    pub message: String,
}

// ============================================================================
// DECISION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub assignment_type: AssignmentType,
    /// Set for normal assignments; `None` when routed to human review.
    pub primary_assignee: Option<String>,
    pub confidence: f64,
    /// Business rules that fired, in firing order.
    pub applied_rules: Vec<String>,
    /// Ordered human-readable notes naming the deciding factors.
    pub reasoning: Vec<String>,
    pub review_triggers: Vec<ReviewTrigger>,
}

impl Decision {
    pub fn is_human_review(&self) -> bool {
        self.assignment_type == AssignmentType::HumanReview
    }
}

// ============================================================================
// TESTS
// ============================================================================
