mod candidate;
mod confidence;
mod pipeline;
mod ranking;
mod rules;
mod scoring;
pub mod snapshot;


pub use candidate::{evaluate_member, Candidate};
pub use confidence::{band_for, evaluate_confidence, ConfidenceBand, ConfidenceFactors};
pub use pipeline::AssignmentEngine;
pub use ranking::rank_candidates;
pub use rules::{
    RULE_FAIR_DISTRIBUTION, RULE_OVERLOAD_PREVENTION, RULE_SKILLS_GAP,
    RULE_TEAM_LEAD_NOTIFICATION, RULE_TIMEZONE_VS_EXPERTISE,
};
pub use scoring::{
    availability_score, composite_score, expertise_factor, in_ist_window, preferred_region,
    similarity_score, skill_match_score, timezone_score, weighted_load, workload_score,
    ComponentScores,
};
pub use snapshot::{load_snapshot, TeamSnapshot};
