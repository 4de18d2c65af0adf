/// Database row types for the team database.
use chrono::{DateTime, NaiveDate, Utc};
use dispatch_core::{ActiveTicket, HolidayEntry, HolidayRegion, Member, TicketPriority, TicketStatus};
use sqlx::FromRow;

use crate::error::StorageError;

#[derive(Debug, Clone, FromRow)]
pub struct MemberRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub timezone: String,
    pub role: String,
    pub skills: String, // comma-separated tags
}

impl MemberRow {
    pub fn into_member(self) -> Member {
        let skills = self
            .skills
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
        Member {
            id: self.id,
            name: self.name,
            email: self.email,
            timezone: self.timezone,
            role: self.role,
            skills,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ActiveTicketRow {
    pub assignee_id: i64,
    pub priority: String,
    pub status: String,
    pub created_at: i64, // milliseconds since epoch
}

impl ActiveTicketRow {
    pub fn into_active_ticket(self) -> Result<(i64, ActiveTicket), StorageError> {
        let priority: TicketPriority = self
            .priority
            .parse()
            .map_err(|e| StorageError::CorruptRow(format!("ticket priority: {e}")))?;
        let status: TicketStatus = self
            .status
            .parse()
            .map_err(|e| StorageError::CorruptRow(format!("ticket status: {e}")))?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(self.created_at).ok_or_else(
            || StorageError::CorruptRow(format!("ticket created_at: {}", self.created_at)),
        )?;
        Ok((
            self.assignee_id,
            ActiveTicket {
                priority,
                status,
                created_at,
            },
        ))
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct HolidayRow {
    pub date: String, // YYYY-MM-DD
    pub region: String,
}

impl HolidayRow {
    pub fn into_holiday(self) -> Result<HolidayEntry, StorageError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| StorageError::CorruptRow(format!("holiday date {:?}: {e}", self.date)))?;
        let region: HolidayRegion = self
            .region
            .parse()
            .map_err(|e| StorageError::CorruptRow(format!("holiday region: {e}")))?;
        Ok(HolidayEntry { date, region })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RecentCountRow {
    pub assignee_id: i64,
    pub assignments: i64,
}
