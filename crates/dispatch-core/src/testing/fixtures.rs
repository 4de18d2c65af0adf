//! Reusable fixtures for engine tests: members, tickets, snapshots, and an
//! in-memory store double with deterministic behavior.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::{HashMap, HashSet};

use crate::domain::{
    ActiveTicket, HolidayEntry, HolidayRegion, LeaveRecord, Member, SimilarTicket, Ticket,
    TicketPriority, TicketStatus,
};
use crate::engine::snapshot::TeamSnapshot;
use crate::ports::TeamStore;

// ============================================================================
// CLOCK
// ============================================================================

/// 04:00 UTC on a weekday, squarely inside the IST window.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 12, 4, 0, 0).unwrap()
}

/// 20:00 UTC the same day, outside the IST window.
pub fn fixed_now_us_hours() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 12, 20, 0, 0).unwrap()
}

pub fn fixed_today() -> NaiveDate {
    fixed_now().date_naive()
}

// ============================================================================
// RECORD BUILDERS
// ============================================================================

pub fn member(id: i64, name: &str, email: &str, timezone: &str, skills: &[&str]) -> Member {
    Member {
        id,
        name: name.to_string(),
        email: email.to_string(),
        timezone: timezone.to_string(),
        role: "USER".to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn ticket(priority: TicketPriority, category: &str) -> Ticket {
    Ticket {
        id: "TCK-1001".to_string(),
        title: "Checkout latency spike".to_string(),
        description: "p99 on the checkout path doubled overnight".to_string(),
        priority,
        category: category.to_string(),
    }
}

pub fn similar(email: &str, similarity: f64) -> SimilarTicket {
    SimilarTicket {
        assignee_email: email.to_string(),
        similarity,
        resolved_at: None,
    }
}

pub fn active(priority: TicketPriority, status: TicketStatus, age_days: i64) -> ActiveTicket {
    ActiveTicket {
        priority,
        status,
        created_at: fixed_now() - chrono::Duration::days(age_days),
    }
}

/// Snapshot with the given members and nothing else going on.
pub fn empty_snapshot(members: Vec<Member>) -> TeamSnapshot {
    TeamSnapshot {
        today: fixed_today(),
        now_utc: fixed_now(),
        members,
        active_tickets: HashMap::new(),
        on_leave: HashSet::new(),
        holidays: Vec::new(),
        recent_assignments: HashMap::new(),
    }
}

// ============================================================================
// STORE DOUBLE
// ============================================================================

/// In-memory `TeamStore` over plain collections. Filtering mirrors what a
/// real store does so scenario tests exercise the same code paths.
#[derive(Debug, Clone, Default)]
pub struct StubTeamStore {
    pub members: Vec<Member>,
    pub active_tickets: HashMap<i64, Vec<ActiveTicket>>,
    pub leaves: Vec<LeaveRecord>,
    pub holidays: Vec<HolidayEntry>,
    pub recent_assignments: HashMap<i64, u32>,
}

impl StubTeamStore {
    pub fn new(members: Vec<Member>) -> Self {
        Self {
            members,
            ..Self::default()
        }
    }

    pub fn with_active(mut self, member_id: i64, tickets: Vec<ActiveTicket>) -> Self {
        self.active_tickets.insert(member_id, tickets);
        self
    }

    pub fn with_leave(mut self, member_id: i64, start: NaiveDate, end: NaiveDate) -> Self {
        self.leaves.push(LeaveRecord {
            member_id,
            start_date: start,
            end_date: end,
        });
        self
    }

    pub fn with_holiday(mut self, date: NaiveDate, region: HolidayRegion) -> Self {
        self.holidays.push(HolidayEntry { date, region });
        self
    }

    pub fn with_recent(mut self, member_id: i64, count: u32) -> Self {
        self.recent_assignments.insert(member_id, count);
        self
    }
}

#[async_trait]
impl TeamStore for StubTeamStore {
    async fn list_members(&self, role: &str) -> anyhow::Result<Vec<Member>> {
        Ok(self
            .members
            .iter()
            .filter(|m| m.role == role)
            .cloned()
            .collect())
    }

    async fn list_active_tickets(
        &self,
        member_ids: &[i64],
    ) -> anyhow::Result<HashMap<i64, Vec<ActiveTicket>>> {
        Ok(self
            .active_tickets
            .iter()
            .filter(|(id, _)| member_ids.contains(id))
            .map(|(id, tickets)| {
                let active: Vec<_> = tickets
                    .iter()
                    .filter(|t| t.status.is_active())
                    .cloned()
                    .collect();
                (*id, active)
            })
            .collect())
    }

    async fn list_active_leaves(
        &self,
        member_ids: &[i64],
        today: NaiveDate,
    ) -> anyhow::Result<HashSet<i64>> {
        Ok(self
            .leaves
            .iter()
            .filter(|leave| member_ids.contains(&leave.member_id) && leave.is_active_on(today))
            .map(|leave| leave.member_id)
            .collect())
    }

    async fn list_holidays(
        &self,
        date: NaiveDate,
        regions: &[HolidayRegion],
    ) -> anyhow::Result<Vec<HolidayEntry>> {
        Ok(self
            .holidays
            .iter()
            .filter(|h| h.date == date && regions.contains(&h.region))
            .cloned()
            .collect())
    }

    async fn count_recent_assignments(
        &self,
        member_ids: &[i64],
        _since: DateTime<Utc>,
    ) -> anyhow::Result<HashMap<i64, u32>> {
        Ok(self
            .recent_assignments
            .iter()
            .filter(|(id, _)| member_ids.contains(id))
            .map(|(id, count)| (*id, *count))
            .collect())
    }
}
