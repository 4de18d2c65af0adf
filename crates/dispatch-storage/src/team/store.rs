use super::models::{ActiveTicketRow, HolidayRow, MemberRow, RecentCountRow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dispatch_core::{ActiveTicket, HolidayEntry, HolidayRegion, Member, TeamStore};
use sqlx::{query_as, SqlitePool};
use std::collections::{HashMap, HashSet};

// SQLite caps bind parameters around 999, so batched lookups chunk their ids.
const CHUNK_SIZE: usize = 500;

fn placeholders(count: usize) -> String {
    std::iter::repeat("?").take(count).collect::<Vec<_>>().join(", ")
}

/// `TeamStore` over a shared SQLite pool. Each trait operation is a single
/// query (per id chunk); the pool is safe to share across concurrent
/// decision calls.
pub struct SqliteTeamStore {
    pool: SqlitePool,
}

impl SqliteTeamStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TeamStore for SqliteTeamStore {
    async fn list_members(&self, role: &str) -> anyhow::Result<Vec<Member>> {
        let rows = query_as::<_, MemberRow>(
            "SELECT id, name, email, timezone, role, skills
             FROM members
             WHERE role = ?
             ORDER BY id",
        )
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MemberRow::into_member).collect())
    }

    async fn list_active_tickets(
        &self,
        member_ids: &[i64],
    ) -> anyhow::Result<HashMap<i64, Vec<ActiveTicket>>> {
        let mut result: HashMap<i64, Vec<ActiveTicket>> = HashMap::new();
        if member_ids.is_empty() {
            return Ok(result);
        }

        for chunk in member_ids.chunks(CHUNK_SIZE) {
            let sql = format!(
                "SELECT assignee_id, priority, status, created_at
                 FROM tickets
                 WHERE status IN ('open', 'in_progress', 'pending')
                   AND assignee_id IN ({})",
                placeholders(chunk.len())
            );

            let mut query = query_as::<_, ActiveTicketRow>(&sql);
            for member_id in chunk {
                query = query.bind(member_id);
            }

            for row in query.fetch_all(&self.pool).await? {
                let (member_id, ticket) = row.into_active_ticket()?;
                result.entry(member_id).or_default().push(ticket);
            }
        }

        Ok(result)
    }

    async fn list_active_leaves(
        &self,
        member_ids: &[i64],
        today: NaiveDate,
    ) -> anyhow::Result<HashSet<i64>> {
        let mut result = HashSet::new();
        if member_ids.is_empty() {
            return Ok(result);
        }

        let today = today.to_string();
        for chunk in member_ids.chunks(CHUNK_SIZE) {
            let sql = format!(
                "SELECT DISTINCT member_id
                 FROM leave_records
                 WHERE start_date <= ? AND end_date >= ?
                   AND member_id IN ({})",
                placeholders(chunk.len())
            );

            let mut query = query_as::<_, (i64,)>(&sql).bind(&today).bind(&today);
            for member_id in chunk {
                query = query.bind(member_id);
            }

            result.extend(
                query
                    .fetch_all(&self.pool)
                    .await?
                    .into_iter()
                    .map(|(id,)| id),
            );
        }

        Ok(result)
    }

    async fn list_holidays(
        &self,
        date: NaiveDate,
        regions: &[HolidayRegion],
    ) -> anyhow::Result<Vec<HolidayEntry>> {
        if regions.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT date, region
             FROM holidays
             WHERE date = ? AND region IN ({})
             ORDER BY region",
            placeholders(regions.len())
        );

        let mut query = query_as::<_, HolidayRow>(&sql).bind(date.to_string());
        for region in regions {
            query = query.bind(region.as_str());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter()
            .map(|row| row.into_holiday().map_err(anyhow::Error::from))
            .collect()
    }

    async fn count_recent_assignments(
        &self,
        member_ids: &[i64],
        since: DateTime<Utc>,
    ) -> anyhow::Result<HashMap<i64, u32>> {
        let mut result = HashMap::new();
        if member_ids.is_empty() {
            return Ok(result);
        }

        for chunk in member_ids.chunks(CHUNK_SIZE) {
            let sql = format!(
                "SELECT assignee_id, COUNT(*) AS assignments
                 FROM tickets
                 WHERE assigned_at IS NOT NULL AND assigned_at >= ?
                   AND assignee_id IN ({})
                 GROUP BY assignee_id",
                placeholders(chunk.len())
            );

            let mut query = query_as::<_, RecentCountRow>(&sql).bind(since.timestamp_millis());
            for member_id in chunk {
                query = query.bind(member_id);
            }

            for row in query.fetch_all(&self.pool).await? {
                result.insert(row.assignee_id, row.assignments as u32);
            }
        }

        Ok(result)
    }
}
