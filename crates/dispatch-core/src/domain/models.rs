use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::EngineError;

// ============================================================================
// TICKET PRIORITY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Critical => "critical",
            TicketPriority::High => "high",
            TicketPriority::Medium => "medium",
            TicketPriority::Low => "low",
        }
    }
}

impl FromStr for TicketPriority {
    type Err = EngineError;

    /// Unknown priorities fail loudly instead of falling through to a default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(TicketPriority::Critical),
            "high" => Ok(TicketPriority::High),
            "medium" => Ok(TicketPriority::Medium),
            "low" => Ok(TicketPriority::Low),
            other => Err(EngineError::InvalidInput(format!(
                "unknown ticket priority: {other:?}"
            ))),
        }
    }
}

// ============================================================================
// TICKET STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Blocked,
    Pending,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Blocked => "blocked",
            TicketStatus::Pending => "pending",
        }
    }

    /// Statuses that count as "active" when loading a member's open work.
    pub fn is_active(&self) -> bool {
        !matches!(self, TicketStatus::Blocked)
    }
}

impl FromStr for TicketStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(TicketStatus::Open),
            "in_progress" => Ok(TicketStatus::InProgress),
            "blocked" => Ok(TicketStatus::Blocked),
            "pending" => Ok(TicketStatus::Pending),
            other => Err(EngineError::InvalidInput(format!(
                "unknown ticket status: {other:?}"
            ))),
        }
    }
}

// ============================================================================
// TICKET (decision input)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: TicketPriority,
    /// Free-form category tag, matched against member skill tags.
    pub category: String,
}

impl Ticket {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.id.trim().is_empty() {
            return Err(EngineError::InvalidInput("ticket id is empty".into()));
        }
        if self.title.trim().is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "ticket {} has an empty title",
                self.id
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SIMILAR TICKET (pre-computed history)
// ============================================================================

/// One entry of the pre-computed similar-ticket list, ordered by similarity
/// descending by the producer. The engine never re-sorts it; every use is
/// order-independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarTicket {
    pub assignee_email: String,
    pub similarity: f64,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl SimilarTicket {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.assignee_email.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "similar ticket has an empty assignee email".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.similarity) {
            return Err(EngineError::InvalidInput(format!(
                "similarity {} for {} is outside [0, 1]",
                self.similarity, self.assignee_email
            )));
        }
        Ok(())
    }
}

// ============================================================================
// REGION
// ============================================================================

/// Coarse geographic tag derived from the member's IANA timezone prefix.
/// Used only for holiday matching and timezone preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    India,
    UnitedStates,
    Unknown,
}

impl Region {
    pub fn from_timezone(timezone: &str) -> Self {
        if timezone.starts_with("Asia/") {
            Region::India
        } else if timezone.starts_with("America/") {
            Region::UnitedStates
        } else {
            Region::Unknown
        }
    }
}

// ============================================================================
// HOLIDAY REGION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HolidayRegion {
    #[serde(rename = "IN")]
    India,
    #[serde(rename = "US")]
    UnitedStates,
    #[serde(rename = "GLOBAL")]
    Global,
}

impl HolidayRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            HolidayRegion::India => "IN",
            HolidayRegion::UnitedStates => "US",
            HolidayRegion::Global => "GLOBAL",
        }
    }

    /// Whether a holiday tagged with this region keeps `member_region` home.
    /// Unknown regions are never blocked by regional entries, only by GLOBAL.
    pub fn applies_to(&self, member_region: Region) -> bool {
        match self {
            HolidayRegion::Global => true,
            HolidayRegion::India => member_region == Region::India,
            HolidayRegion::UnitedStates => member_region == Region::UnitedStates,
        }
    }
}

impl FromStr for HolidayRegion {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "IN" => Ok(HolidayRegion::India),
            "US" => Ok(HolidayRegion::UnitedStates),
            "GLOBAL" => Ok(HolidayRegion::Global),
            other => Err(EngineError::InvalidInput(format!(
                "unknown holiday region: {other:?}"
            ))),
        }
    }
}

// ============================================================================
// MEMBER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: i64,
    pub name: String,
    /// Unique primary key for joining against SimilarTicket assignees.
    pub email: String,
    /// IANA zone name, e.g. "Asia/Kolkata".
    pub timezone: String,
    pub role: String,
    pub skills: Vec<String>,
}

impl Member {
    pub fn region(&self) -> Region {
        Region::from_timezone(&self.timezone)
    }
}

// ============================================================================
// ACTIVE TICKET
// ============================================================================

/// A member's open piece of work, as seen by the workload calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveTicket {
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// LEAVE RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRecord {
    pub member_id: i64,
    /// Inclusive start date.
    pub start_date: NaiveDate,
    /// Inclusive end date.
    pub end_date: NaiveDate,
}

impl LeaveRecord {
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

// ============================================================================
// HOLIDAY ENTRY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolidayEntry {
    pub date: NaiveDate,
    pub region: HolidayRegion,
}

impl HolidayEntry {
    pub fn blocks(&self, member_region: Region, day: NaiveDate) -> bool {
        self.date == day && self.region.applies_to(member_region)
    }
}

// ============================================================================
// TESTS
// ============================================================================
