pub mod config;
pub mod domain;
pub mod engine;
pub mod ports;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export commonly used types
pub use config::{ComponentWeights, EngineConfig, WeightTable};

pub use domain::{
    ActiveTicket, AssignmentType, Decision, EngineError, HolidayEntry, HolidayRegion, LeaveRecord,
    Member, Region, ReviewAction, ReviewReason, ReviewTrigger, SimilarTicket, Ticket,
    TicketPriority, TicketStatus, TriggerSeverity,
};

pub use ports::TeamStore;

pub use engine::{
    expertise_factor, load_snapshot, rank_candidates, similarity_score, skill_match_score,
    AssignmentEngine, Candidate, ComponentScores, ConfidenceBand, TeamSnapshot,
};
