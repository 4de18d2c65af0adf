//! Point-in-time view of team state for a single decision call.
//!
//! The loader issues one query per concern — members first, then the four
//! batched lookups fanned out concurrently — and joins everything into an
//! immutable `TeamSnapshot` before scoring begins. Query count is bounded
//! regardless of team size.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};

use crate::domain::{ActiveTicket, EngineError, HolidayEntry, HolidayRegion, Member};
use crate::ports::TeamStore;

const HOLIDAY_REGIONS: [HolidayRegion; 3] = [
    HolidayRegion::India,
    HolidayRegion::UnitedStates,
    HolidayRegion::Global,
];

// ============================================================================
// TEAM SNAPSHOT
// ============================================================================

/// Read-only team state for one decision. Internally consistent: every row
/// references a member present in `members`.
#[derive(Debug, Clone)]
pub struct TeamSnapshot {
    pub today: NaiveDate,
    pub now_utc: DateTime<Utc>,
    pub members: Vec<Member>,
    pub active_tickets: HashMap<i64, Vec<ActiveTicket>>,
    pub on_leave: HashSet<i64>,
    pub holidays: Vec<HolidayEntry>,
    pub recent_assignments: HashMap<i64, u32>,
}

impl TeamSnapshot {
    /// Binary availability: not on leave, no regional holiday, no global
    /// holiday. There are no graded values.
    pub fn is_available(&self, member: &Member) -> bool {
        if self.on_leave.contains(&member.id) {
            return false;
        }
        let region = member.region();
        !self
            .holidays
            .iter()
            .any(|holiday| holiday.blocks(region, self.today))
    }

    pub fn active_tickets_for(&self, member_id: i64) -> &[ActiveTicket] {
        self.active_tickets
            .get(&member_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Absent counts default to 0 rather than failing the call.
    pub fn recent_assignments_for(&self, member_id: i64) -> u32 {
        self.recent_assignments
            .get(&member_id)
            .copied()
            .unwrap_or(0)
    }

    /// Every per-member row must reference a loaded member.
    fn verify_consistency(&self) -> Result<(), EngineError> {
        let known: HashSet<i64> = self.members.iter().map(|m| m.id).collect();

        for id in self
            .active_tickets
            .keys()
            .chain(self.recent_assignments.keys())
            .chain(self.on_leave.iter())
        {
            if !known.contains(id) {
                return Err(EngineError::InvariantViolation(format!(
                    "snapshot row references member {id} outside the team set"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// LOADER
// ============================================================================

/// Fetch a consistent snapshot as of `now_utc`.
///
/// The member list gates the batched lookups, which then run concurrently;
/// cancellation of the call propagates into the outstanding store futures.
pub async fn load_snapshot(
    store: &dyn TeamStore,
    role: &str,
    recent_window_days: u32,
    now_utc: DateTime<Utc>,
) -> Result<TeamSnapshot, EngineError> {
    let today = now_utc.date_naive();

    let members = store.list_members(role).await.map_err(EngineError::store)?;
    let member_ids: Vec<i64> = members.iter().map(|m| m.id).collect();
    let since = now_utc - Duration::days(i64::from(recent_window_days));

    let (active_tickets, on_leave, holidays, recent_assignments) = tokio::try_join!(
        store.list_active_tickets(&member_ids),
        store.list_active_leaves(&member_ids, today),
        store.list_holidays(today, &HOLIDAY_REGIONS),
        store.count_recent_assignments(&member_ids, since),
    )
    .map_err(EngineError::store)?;

    tracing::debug!(
        members = members.len(),
        on_leave = on_leave.len(),
        holidays = holidays.len(),
        "team snapshot loaded"
    );

    let snapshot = TeamSnapshot {
        today,
        now_utc,
        members,
        active_tickets,
        on_leave,
        holidays,
        recent_assignments,
    };
    snapshot.verify_consistency()?;
    Ok(snapshot)
}

// ============================================================================
// TESTS
// ============================================================================
