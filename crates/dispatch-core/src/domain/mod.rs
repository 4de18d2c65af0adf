pub mod decision;
pub mod errors;
pub mod models;

pub use decision::{
    AssignmentType, Decision, ReviewAction, ReviewReason, ReviewTrigger, TriggerSeverity,
};
pub use errors::EngineError;
pub use models::{
    ActiveTicket, HolidayEntry, HolidayRegion, LeaveRecord, Member, Region, SimilarTicket, Ticket,
    TicketPriority, TicketStatus,
};
