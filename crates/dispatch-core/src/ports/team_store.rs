use crate::domain::{ActiveTicket, HolidayEntry, HolidayRegion, Member};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};

/// Read-only store surface the decision core consumes.
///
/// Each operation is one batched query; implementations may retry internally,
/// the core only observes success-with-data or failure. The handle is shared
/// across concurrent decision calls and must be safe for concurrent use.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// All members carrying the given role tag.
    async fn list_members(&self, role: &str) -> anyhow::Result<Vec<Member>>;

    /// Active tickets (open, in_progress, pending) per member, batched.
    async fn list_active_tickets(
        &self,
        member_ids: &[i64],
    ) -> anyhow::Result<HashMap<i64, Vec<ActiveTicket>>>;

    /// Ids of members with a leave record overlapping `today`.
    async fn list_active_leaves(
        &self,
        member_ids: &[i64],
        today: NaiveDate,
    ) -> anyhow::Result<HashSet<i64>>;

    /// Holiday entries for `date` restricted to the given regions.
    async fn list_holidays(
        &self,
        date: NaiveDate,
        regions: &[HolidayRegion],
    ) -> anyhow::Result<Vec<HolidayEntry>>;

    /// Tickets assigned to each member since `since` (any status), batched.
    /// Members with no recent assignments may be absent from the map.
    async fn count_recent_assignments(
        &self,
        member_ids: &[i64],
        since: DateTime<Utc>,
    ) -> anyhow::Result<HashMap<i64, u32>>;
}
