use chrono::{NaiveDate, TimeZone, Utc};
use dispatch_core::{
    AssignmentEngine, AssignmentType, EngineConfig, HolidayRegion, SimilarTicket, TeamStore,
    Ticket, TicketPriority,
};
use dispatch_storage::{init_team_db, SqliteTeamStore};
use sqlx::SqlitePool;
use std::sync::Arc;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
}

fn now_millis() -> i64 {
    Utc.with_ymd_and_hms(2025, 3, 12, 4, 0, 0)
        .unwrap()
        .timestamp_millis()
}

async fn seed_member(pool: &SqlitePool, id: i64, email: &str, timezone: &str, skills: &str) {
    sqlx::query(
        "INSERT INTO members (id, name, email, timezone, role, skills)
         VALUES (?, ?, ?, ?, 'USER', ?)",
    )
    .bind(id)
    .bind(email.split('@').next().unwrap())
    .bind(email)
    .bind(timezone)
    .bind(skills)
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_ticket(
    pool: &SqlitePool,
    assignee_id: i64,
    priority: &str,
    status: &str,
    created_at: i64,
    assigned_at: Option<i64>,
) {
    sqlx::query(
        "INSERT INTO tickets (assignee_id, priority, status, created_at, assigned_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(assignee_id)
    .bind(priority)
    .bind(status)
    .bind(created_at)
    .bind(assigned_at)
    .execute(pool)
    .await
    .unwrap();
}

async fn seed_leave(pool: &SqlitePool, member_id: i64, start: &str, end: &str) {
    sqlx::query("INSERT INTO leave_records (member_id, start_date, end_date) VALUES (?, ?, ?)")
        .bind(member_id)
        .bind(start)
        .bind(end)
        .execute(pool)
        .await
        .unwrap();
}

async fn seed_holiday(pool: &SqlitePool, date: &str, region: &str) {
    sqlx::query("INSERT INTO holidays (date, region, name) VALUES (?, ?, NULL)")
        .bind(date)
        .bind(region)
        .execute(pool)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_init_runs_migrations() {
    let pool = init_team_db(":memory:").await.unwrap();
    let row = sqlx::query("SELECT name FROM sqlite_master WHERE type='table' AND name='members'")
        .fetch_optional(&pool)
        .await
        .unwrap();
    assert!(row.is_some(), "members table should exist after migrations");
}

#[tokio::test]
async fn test_init_on_disk_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("team.db");
    let pool = init_team_db(path.to_str().unwrap()).await.unwrap();
    seed_member(&pool, 1, "ravi@example.com", "Asia/Kolkata", "database").await;
    let store = SqliteTeamStore::new(pool);
    assert_eq!(store.list_members("USER").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_members_filters_role_and_parses_skills() {
    let pool = init_team_db(":memory:").await.unwrap();
    seed_member(&pool, 1, "ravi@example.com", "Asia/Kolkata", "database, api").await;
    sqlx::query(
        "INSERT INTO members (id, name, email, timezone, role, skills)
         VALUES (2, 'Lead', 'lead@example.com', 'Asia/Kolkata', 'MANAGER', '')",
    )
    .execute(&pool)
    .await
    .unwrap();

    let store = SqliteTeamStore::new(pool);
    let members = store.list_members("USER").await.unwrap();

    assert_eq!(members.len(), 1);
    assert_eq!(members[0].email, "ravi@example.com");
    assert_eq!(members[0].skills, vec!["database", "api"]);
}

#[tokio::test]
async fn test_list_active_tickets_filters_status_and_ids() {
    let pool = init_team_db(":memory:").await.unwrap();
    seed_member(&pool, 1, "ravi@example.com", "Asia/Kolkata", "").await;
    seed_member(&pool, 2, "priya@example.com", "Asia/Kolkata", "").await;
    seed_ticket(&pool, 1, "high", "open", now_millis(), None).await;
    seed_ticket(&pool, 1, "critical", "in_progress", now_millis(), None).await;
    seed_ticket(&pool, 1, "low", "blocked", now_millis(), None).await;
    seed_ticket(&pool, 2, "medium", "pending", now_millis(), None).await;

    let store = SqliteTeamStore::new(pool);
    let tickets = store.list_active_tickets(&[1]).await.unwrap();

    let ravi = tickets.get(&1).unwrap();
    assert_eq!(ravi.len(), 2, "blocked tickets are not active");
    assert!(
        !tickets.contains_key(&2),
        "only requested member ids come back"
    );
    assert!(ravi.iter().any(|t| t.priority == TicketPriority::Critical));
}

#[tokio::test]
async fn test_list_active_leaves_overlap_is_inclusive() {
    let pool = init_team_db(":memory:").await.unwrap();
    for id in 1..=4 {
        seed_member(&pool, id, &format!("m{id}@example.com"), "Asia/Kolkata", "").await;
    }
    seed_leave(&pool, 1, "2025-03-10", "2025-03-12").await; // ends today
    seed_leave(&pool, 2, "2025-03-12", "2025-03-14").await; // starts today
    seed_leave(&pool, 3, "2025-03-13", "2025-03-15").await; // starts tomorrow

    let store = SqliteTeamStore::new(pool);
    let on_leave = store
        .list_active_leaves(&[1, 2, 3, 4], today())
        .await
        .unwrap();

    assert!(on_leave.contains(&1));
    assert!(on_leave.contains(&2));
    assert!(!on_leave.contains(&3));
    assert!(!on_leave.contains(&4));
}

#[tokio::test]
async fn test_list_holidays_filters_date_and_region() {
    let pool = init_team_db(":memory:").await.unwrap();
    seed_holiday(&pool, "2025-03-12", "IN").await;
    seed_holiday(&pool, "2025-03-12", "GLOBAL").await;
    seed_holiday(&pool, "2025-03-13", "US").await;

    let store = SqliteTeamStore::new(pool);
    let holidays = store
        .list_holidays(today(), &[HolidayRegion::India, HolidayRegion::Global])
        .await
        .unwrap();

    assert_eq!(holidays.len(), 2);
    assert!(holidays.iter().all(|h| h.date == today()));

    let none = store
        .list_holidays(today(), &[HolidayRegion::UnitedStates])
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_count_recent_assignments_respects_cutoff() {
    let pool = init_team_db(":memory:").await.unwrap();
    seed_member(&pool, 1, "ravi@example.com", "Asia/Kolkata", "").await;
    let now = now_millis();
    let day = 86_400_000i64;
    // Two inside the window, one before it, one never assigned
    seed_ticket(&pool, 1, "high", "open", now, Some(now - day)).await;
    seed_ticket(&pool, 1, "high", "open", now, Some(now - 3 * day)).await;
    seed_ticket(&pool, 1, "high", "open", now, Some(now - 10 * day)).await;
    seed_ticket(&pool, 1, "high", "open", now, None).await;

    let store = SqliteTeamStore::new(pool);
    let since = Utc.timestamp_millis_opt(now - 7 * day).unwrap();
    let counts = store.count_recent_assignments(&[1], since).await.unwrap();

    assert_eq!(counts.get(&1).copied(), Some(2));
}

#[tokio::test]
async fn test_empty_member_batches_short_circuit() {
    let pool = init_team_db(":memory:").await.unwrap();
    let store = SqliteTeamStore::new(pool);

    assert!(store.list_active_tickets(&[]).await.unwrap().is_empty());
    assert!(store
        .list_active_leaves(&[], today())
        .await
        .unwrap()
        .is_empty());
    assert!(store
        .count_recent_assignments(&[], Utc::now())
        .await
        .unwrap()
        .is_empty());
}

// ============================================================================
// END TO END: engine over the real store
// ============================================================================

// The engine's snapshot loader fans queries out concurrently, so these tests
// use a file-backed database: a `:memory:` pool would hand each checked-out
// connection its own empty database.
#[tokio::test]
async fn test_engine_assigns_over_sqlite_store() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("team.db");
    let pool = init_team_db(db_path.to_str().unwrap()).await.unwrap();
    seed_member(&pool, 1, "ravi@example.com", "Asia/Kolkata", "database").await;
    seed_member(&pool, 2, "priya@example.com", "Asia/Kolkata", "frontend").await;

    let engine = AssignmentEngine::new(
        Arc::new(SqliteTeamStore::new(pool)),
        EngineConfig::default(),
    )
    .unwrap();

    let ticket = Ticket {
        id: "TCK-2001".to_string(),
        title: "Replica lag".to_string(),
        description: "read replicas trailing by minutes".to_string(),
        priority: TicketPriority::High,
        category: "database".to_string(),
    };
    let similar = vec![
        SimilarTicket {
            assignee_email: "ravi@example.com".to_string(),
            similarity: 0.91,
            resolved_at: None,
        },
        SimilarTicket {
            assignee_email: "ravi@example.com".to_string(),
            similarity: 0.87,
            resolved_at: None,
        },
    ];

    let now = Utc.with_ymd_and_hms(2025, 3, 12, 4, 0, 0).unwrap();
    let decision = engine.assign_ticket_at(&ticket, &similar, now).await.unwrap();

    assert_eq!(decision.assignment_type, AssignmentType::Normal);
    assert_eq!(decision.primary_assignee.as_deref(), Some("ravi@example.com"));
    assert!(decision.confidence >= 0.5);
}

#[tokio::test]
async fn test_engine_sees_leave_through_store() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("team.db");
    let pool = init_team_db(db_path.to_str().unwrap()).await.unwrap();
    seed_member(&pool, 1, "ravi@example.com", "Asia/Kolkata", "database").await;
    seed_member(&pool, 2, "sneha@example.com", "Asia/Kolkata", "database").await;
    seed_leave(&pool, 1, "2025-03-12", "2025-03-12").await;

    let engine = AssignmentEngine::new(
        Arc::new(SqliteTeamStore::new(pool)),
        EngineConfig::default(),
    )
    .unwrap();

    let ticket = Ticket {
        id: "TCK-2002".to_string(),
        title: "Login failures".to_string(),
        description: String::new(),
        priority: TicketPriority::High,
        category: "database".to_string(),
    };
    let similar = vec![
        SimilarTicket {
            assignee_email: "ravi@example.com".to_string(),
            similarity: 0.9,
            resolved_at: None,
        },
        SimilarTicket {
            assignee_email: "sneha@example.com".to_string(),
            similarity: 0.88,
            resolved_at: None,
        },
    ];

    let now = Utc.with_ymd_and_hms(2025, 3, 12, 4, 0, 0).unwrap();
    let decision = engine.assign_ticket_at(&ticket, &similar, now).await.unwrap();

    assert_eq!(
        decision.primary_assignee.as_deref(),
        Some("sneha@example.com"),
        "ravi is on leave today"
    );
}
