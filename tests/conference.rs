// tests/conference.rs

use seating_backend::{
    common::error::AppError,
    config::AppState,
    models::conference::{
        AssignmentInput, AssignmentPatch, AssignmentStatus, AttendeeInput, Meeting, TableInput, TablePatch,
        TableType, TableUpsert,
    },
    services::{
        conference_service::ConferenceService,
        scope_service::{ResolvePolicy, ScopeRequest, ScopeResolver},
    },
};
use sqlx::PgPool;

fn service(pool: PgPool) -> ConferenceService {
    let scope = ScopeResolver::new(ResolvePolicy::Permissive, "QUICK-START", "Quick Start");
    AppState::from_pool(pool, scope).conference_service
}

fn table(label: &str, seats: i32) -> TableInput {
    TableInput {
        label: label.to_string(),
        table_type: TableType::Circle,
        seats: Some(seats),
        x: None,
        y: None,
    }
}

fn attendee(name: &str) -> AttendeeInput {
    AttendeeInput {
        full_name: name.to_string(),
        ..Default::default()
    }
}

fn seat(table_id: i64, attendee_id: i64, seat_index: i32) -> AssignmentInput {
    AssignmentInput {
        table_id,
        attendee_id,
        seat_index,
        status: AssignmentStatus::Assigned,
    }
}

async fn meeting(svc: &ConferenceService, code: &str) -> Meeting {
    svc.resolve_meeting(&ScopeRequest::by_code(code)).await.unwrap()
}

#[sqlx::test]
async fn same_label_lives_independently_in_two_meetings(pool: PgPool) {
    let svc = service(pool);
    let e1 = meeting(&svc, "E1").await;
    let e2 = meeting(&svc, "E2").await;

    let t1 = svc.create_table(e1.id, &table("T1", 6)).await.unwrap();
    let t2 = svc.create_table(e2.id, &table("T1", 8)).await.unwrap();

    assert_ne!(t1.id, t2.id);
    assert_eq!(svc.list_tables(e1.id).await.unwrap().len(), 1);
    assert_eq!(svc.get_table(e2.id, t2.id).await.unwrap().seats, 8);

    let dup = svc.create_table(e1.id, &table("T1", 4)).await.unwrap_err();
    assert!(matches!(dup, AppError::LabelAlreadyExists(label) if label == "T1"));
}

#[sqlx::test]
async fn records_of_another_meeting_read_as_not_found(pool: PgPool) {
    let svc = service(pool);
    let e1 = meeting(&svc, "E1").await;
    let e2 = meeting(&svc, "E2").await;

    let t = svc.create_table(e1.id, &table("T1", 6)).await.unwrap();
    let a = svc.create_attendee(e2.id, &attendee("Ada")).await.unwrap();

    assert!(matches!(svc.get_table(e2.id, t.id).await, Err(AppError::NotFound { resource: "table", .. })));

    let err = svc.create_assignment(e2.id, &seat(t.id, a.id, 0)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { resource: "table", .. }));

    let err = svc.create_assignment(e1.id, &seat(t.id, a.id, 0)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { resource: "attendee", .. }));
}

#[sqlx::test]
async fn a_seat_takes_one_attendee(pool: PgPool) {
    let svc = service(pool);
    let e = meeting(&svc, "E1").await;
    let t = svc.create_table(e.id, &table("T1", 6)).await.unwrap();
    let a1 = svc.create_attendee(e.id, &attendee("Ada")).await.unwrap();
    let a2 = svc.create_attendee(e.id, &attendee("Grace")).await.unwrap();

    let first = svc.create_assignment(e.id, &seat(t.id, a1.id, 2)).await.unwrap();
    assert_eq!(first.meeting_id, e.id);
    assert_eq!(first.status, AssignmentStatus::Assigned);

    let err = svc.create_assignment(e.id, &seat(t.id, a2.id, 2)).await.unwrap_err();
    assert!(matches!(err, AppError::SeatAlreadyTaken { table_id, seat_index: 2 } if table_id == t.id));
}

#[sqlx::test]
async fn concurrent_claims_on_one_seat_yield_one_winner(pool: PgPool) {
    let svc = service(pool);
    let e = meeting(&svc, "E1").await;
    let t = svc.create_table(e.id, &table("T1", 6)).await.unwrap();
    let a1 = svc.create_attendee(e.id, &attendee("Ada")).await.unwrap();
    let a2 = svc.create_attendee(e.id, &attendee("Grace")).await.unwrap();

    let first = seat(t.id, a1.id, 0);
    let second = seat(t.id, a2.id, 0);
    let (r1, r2) = tokio::join!(
        svc.create_assignment(e.id, &first),
        svc.create_assignment(e.id, &second),
    );

    let wins = [r1.is_ok(), r2.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(wins, 1);
    let loser = if r1.is_err() { r1.unwrap_err() } else { r2.unwrap_err() };
    assert!(matches!(loser, AppError::SeatAlreadyTaken { .. }));
    assert_eq!(svc.list_assignments(e.id).await.unwrap().len(), 1);
}

#[sqlx::test]
async fn seat_index_must_exist_on_the_table(pool: PgPool) {
    let svc = service(pool);
    let e = meeting(&svc, "E1").await;
    let t = svc.create_table(e.id, &table("T1", 4)).await.unwrap();
    let a = svc.create_attendee(e.id, &attendee("Ada")).await.unwrap();

    let err = svc.create_assignment(e.id, &seat(t.id, a.id, 4)).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
    assert!(svc.list_assignments(e.id).await.unwrap().is_empty());
}

#[sqlx::test]
async fn bulk_upsert_by_label_keeps_the_row(pool: PgPool) {
    let svc = service(pool);
    let e = meeting(&svc, "E1").await;
    let original = svc.create_table(e.id, &table("T1", 6)).await.unwrap();

    let ids = svc
        .bulk_upsert_tables(
            e.id,
            vec![
                TableUpsert { id: None, table: TableInput { x: Some(300), ..table("T1", 10) } },
                TableUpsert { id: None, table: table("T2", 6) },
            ],
        )
        .await
        .unwrap();

    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], original.id);

    let updated = svc.get_table(e.id, original.id).await.unwrap();
    assert_eq!(updated.seats, 10);
    assert_eq!(updated.x, 300);
    assert_eq!(updated.y, original.y);
}

#[sqlx::test]
async fn bulk_upsert_by_id_can_rename(pool: PgPool) {
    let svc = service(pool);
    let e = meeting(&svc, "E1").await;
    let t = svc.create_table(e.id, &table("T1", 6)).await.unwrap();

    let ids = svc
        .bulk_upsert_tables(e.id, vec![TableUpsert { id: Some(t.id), table: table("VIP", 6) }])
        .await
        .unwrap();

    assert_eq!(ids, vec![t.id]);
    assert_eq!(svc.get_table(e.id, t.id).await.unwrap().label, "VIP");
}

#[sqlx::test]
async fn failing_bulk_item_rolls_back_the_batch(pool: PgPool) {
    let svc = service(pool);
    let e = meeting(&svc, "E1").await;

    let err = svc
        .bulk_upsert_tables(
            e.id,
            vec![
                TableUpsert { id: None, table: table("T1", 6) },
                TableUpsert { id: Some(999_999), table: table("T2", 6) },
            ],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound { resource: "table", .. }));
    assert!(svc.list_tables(e.id).await.unwrap().is_empty());
}

#[sqlx::test]
async fn concurrent_resolution_of_a_new_code_creates_one_meeting(pool: PgPool) {
    let svc = service(pool);
    let request = ScopeRequest::by_code("C-NEW-0001");

    let (m1, m2) = tokio::join!(svc.resolve_meeting(&request), svc.resolve_meeting(&request));
    let (m1, m2) = (m1.unwrap(), m2.unwrap());

    assert_eq!(m1.id, m2.id);
    assert_eq!(m1.title, "C-NEW-0001");
    assert_eq!(svc.list_meetings().await.unwrap().len(), 1);
}

#[sqlx::test]
async fn empty_request_falls_back_to_latest_or_default(pool: PgPool) {
    let svc = service(pool);

    let default = svc.resolve_meeting(&ScopeRequest::default()).await.unwrap();
    assert_eq!(default.code, "QUICK-START");
    assert_eq!(default.title, "Quick Start");

    let newer = meeting(&svc, "LATER").await;
    let latest = svc.resolve_meeting(&ScopeRequest::default()).await.unwrap();
    assert_eq!(latest.id, newer.id);
}

#[sqlx::test]
async fn strict_policy_rejects_an_empty_request(pool: PgPool) {
    let svc = AppState::from_pool(pool, ScopeResolver::strict()).conference_service;

    let err = svc.resolve_meeting(&ScopeRequest::default()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { resource: "meeting", .. }));

    // A code still creates the meeting.
    let created = svc.resolve_meeting(&ScopeRequest::by_code("C-1")).await.unwrap();
    assert_eq!(created.code, "C-1");
}

#[sqlx::test]
async fn clearing_one_meeting_leaves_the_other_alone(pool: PgPool) {
    let svc = service(pool);
    let mut meetings = Vec::new();

    for code in ["E1", "E2"] {
        let e = meeting(&svc, code).await;
        let t = svc.create_table(e.id, &table("T1", 6)).await.unwrap();
        let a = svc.create_attendee(e.id, &attendee("Ada")).await.unwrap();
        svc.create_assignment(e.id, &seat(t.id, a.id, 0)).await.unwrap();
        meetings.push(e);
    }

    assert_eq!(svc.clear_assignments(meetings[0].id).await.unwrap(), 1);
    assert_eq!(svc.clear_assignments(meetings[0].id).await.unwrap(), 0);

    assert!(svc.list_assignments(meetings[0].id).await.unwrap().is_empty());
    assert_eq!(svc.list_assignments(meetings[1].id).await.unwrap().len(), 1);
}

#[sqlx::test]
async fn bootstrap_returns_everything_of_the_meeting(pool: PgPool) {
    let svc = service(pool);
    let e = meeting(&svc, "E1").await;
    let other = meeting(&svc, "E2").await;

    let t1 = svc.create_table(e.id, &table("T1", 6)).await.unwrap();
    svc.create_table(e.id, &table("T2", 6)).await.unwrap();
    svc.create_table(other.id, &table("T1", 6)).await.unwrap();

    let mut attendees = Vec::new();
    for name in ["Ada", "Grace", "Barbara"] {
        attendees.push(svc.create_attendee(e.id, &attendee(name)).await.unwrap());
    }
    svc.create_assignment(e.id, &seat(t1.id, attendees[0].id, 0)).await.unwrap();

    let snapshot = svc.bootstrap(e.clone()).await.unwrap();

    assert_eq!(snapshot.meeting.id, e.id);
    assert_eq!(snapshot.tables.len(), 2);
    assert_eq!(snapshot.attendees.len(), 3);
    assert_eq!(snapshot.assignments.len(), 1);
    assert!(snapshot.tables.iter().all(|t| t.meeting_id == e.id));
}

#[sqlx::test]
async fn rebooking_a_seated_table_in_bulk_conflicts_and_writes_nothing(pool: PgPool) {
    let svc = service(pool);
    let e = meeting(&svc, "C-TEST-0001").await;

    let table_ids = svc
        .bulk_upsert_tables(
            e.id,
            vec![
                TableUpsert { id: None, table: table("T1", 6) },
                TableUpsert { id: None, table: TableInput { table_type: TableType::Row, ..table("T2", 6) } },
            ],
        )
        .await
        .unwrap();
    let ada = svc.create_attendee(e.id, &attendee("Ada")).await.unwrap();
    let grace = svc.create_attendee(e.id, &attendee("Grace")).await.unwrap();

    let batch = vec![seat(table_ids[0], ada.id, 0), seat(table_ids[1], grace.id, 1)];
    let ids = svc.bulk_create_assignments(e.id, &batch).await.unwrap();
    assert_eq!(ids.len(), 2);

    let err = svc.bulk_create_assignments(e.id, &batch).await.unwrap_err();
    assert!(matches!(err, AppError::SeatAlreadyTaken { seat_index: 0, .. }));
    assert_eq!(svc.list_assignments(e.id).await.unwrap().len(), 2);
}

#[sqlx::test]
async fn moving_an_assignment_checks_the_target_seat(pool: PgPool) {
    let svc = service(pool);
    let e = meeting(&svc, "E1").await;
    let t = svc.create_table(e.id, &table("T1", 6)).await.unwrap();
    let ada = svc.create_attendee(e.id, &attendee("Ada")).await.unwrap();
    let grace = svc.create_attendee(e.id, &attendee("Grace")).await.unwrap();

    let a1 = svc.create_assignment(e.id, &seat(t.id, ada.id, 0)).await.unwrap();
    svc.create_assignment(e.id, &seat(t.id, grace.id, 1)).await.unwrap();

    let taken = AssignmentPatch { seat_index: Some(1), ..Default::default() };
    assert!(matches!(
        svc.update_assignment(e.id, a1.id, &taken).await,
        Err(AppError::SeatAlreadyTaken { .. })
    ));

    let free = AssignmentPatch {
        seat_index: Some(5),
        status: Some(AssignmentStatus::CheckedIn),
        ..Default::default()
    };
    let moved = svc.update_assignment(e.id, a1.id, &free).await.unwrap();
    assert_eq!(moved.seat_index, 5);
    assert_eq!(moved.status, AssignmentStatus::CheckedIn);
}

#[sqlx::test]
async fn deleting_a_meeting_cascades(pool: PgPool) {
    let svc = service(pool);
    let e = meeting(&svc, "E1").await;
    let t = svc.create_table(e.id, &table("T1", 6)).await.unwrap();

    svc.delete_meeting(e.id).await.unwrap();

    assert!(matches!(svc.get_meeting(e.id).await, Err(AppError::NotFound { .. })));
    assert!(matches!(svc.get_table(e.id, t.id).await, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
async fn created_meetings_get_a_generated_code(pool: PgPool) {
    let svc = service(pool);

    let m = svc.create_meeting(None, None, None).await.unwrap();
    assert!(m.code.starts_with("C-"));
    assert_eq!(m.title, m.code);

    let err = svc.create_meeting(Some(m.code.clone()), None, None).await.unwrap_err();
    assert!(matches!(err, AppError::EventCodeAlreadyExists(_)));
}

#[sqlx::test]
async fn bulk_item_without_seats_keeps_the_stored_count(pool: PgPool) {
    let svc = service(pool);
    let e = meeting(&svc, "E1").await;
    let t = svc.create_table(e.id, &table("T1", 10)).await.unwrap();
    let a = svc.create_attendee(e.id, &attendee("Ada")).await.unwrap();
    svc.create_assignment(e.id, &seat(t.id, a.id, 9)).await.unwrap();

    let no_seats = TableInput { seats: None, x: Some(300), ..table("T1", 0) };
    svc.bulk_upsert_tables(
        e.id,
        vec![
            TableUpsert { id: None, table: no_seats.clone() },
            TableUpsert { id: Some(t.id), table: no_seats },
        ],
    )
    .await
    .unwrap();

    let after = svc.get_table(e.id, t.id).await.unwrap();
    assert_eq!(after.seats, 10);
    assert_eq!(after.x, 300);

    let fresh = TableInput { seats: None, ..table("T2", 0) };
    let created = svc.create_table(e.id, &fresh).await.unwrap();
    assert_eq!(created.seats, 6);
}

#[sqlx::test]
async fn tables_cannot_shrink_below_an_occupied_seat(pool: PgPool) {
    let svc = service(pool);
    let e = meeting(&svc, "E1").await;
    let t = svc.create_table(e.id, &table("T1", 6)).await.unwrap();
    let a = svc.create_attendee(e.id, &attendee("Ada")).await.unwrap();
    svc.create_assignment(e.id, &seat(t.id, a.id, 3)).await.unwrap();

    let shrink = TablePatch { seats: Some(3), ..Default::default() };
    let err = svc.update_table(e.id, t.id, &shrink).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));

    let by_label = svc
        .bulk_upsert_tables(
            e.id,
            vec![
                TableUpsert { id: None, table: table("T2", 6) },
                TableUpsert { id: None, table: table("T1", 0) },
            ],
        )
        .await
        .unwrap_err();
    assert!(matches!(by_label, AppError::ValidationError(_)));

    let by_id = svc
        .bulk_upsert_tables(e.id, vec![TableUpsert { id: Some(t.id), table: table("T1", 2) }])
        .await
        .unwrap_err();
    assert!(matches!(by_id, AppError::ValidationError(_)));

    // Nothing from the rejected writes stuck.
    let tables = svc.list_tables(e.id).await.unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].seats, 6);

    // Shrinking down to exactly the occupied seat is fine.
    let fits = TablePatch { seats: Some(4), ..Default::default() };
    assert_eq!(svc.update_table(e.id, t.id, &fits).await.unwrap().seats, 4);
}

#[sqlx::test]
async fn bulk_assignments_reject_a_later_item_from_another_meeting(pool: PgPool) {
    let svc = service(pool);
    let e1 = meeting(&svc, "E1").await;
    let e2 = meeting(&svc, "E2").await;

    let t1 = svc.create_table(e1.id, &table("T1", 6)).await.unwrap();
    let ada = svc.create_attendee(e1.id, &attendee("Ada")).await.unwrap();
    let grace = svc.create_attendee(e1.id, &attendee("Grace")).await.unwrap();
    let foreign_table = svc.create_table(e2.id, &table("T1", 6)).await.unwrap();
    let foreign_attendee = svc.create_attendee(e2.id, &attendee("Linus")).await.unwrap();

    let err = svc
        .bulk_create_assignments(e1.id, &[seat(t1.id, ada.id, 0), seat(foreign_table.id, grace.id, 0)])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { resource: "table", key } if key == foreign_table.id.to_string()));

    let err = svc
        .bulk_create_assignments(e1.id, &[seat(t1.id, ada.id, 0), seat(t1.id, foreign_attendee.id, 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { resource: "attendee", key } if key == foreign_attendee.id.to_string()));

    assert!(svc.list_assignments(e1.id).await.unwrap().is_empty());
    assert!(svc.list_assignments(e2.id).await.unwrap().is_empty());
}

#[sqlx::test]
async fn concurrent_bulk_batches_on_one_seat_yield_one_winner(pool: PgPool) {
    let svc = service(pool);
    let e = meeting(&svc, "E1").await;
    let t = svc.create_table(e.id, &table("T1", 6)).await.unwrap();
    let ada = svc.create_attendee(e.id, &attendee("Ada")).await.unwrap();
    let grace = svc.create_attendee(e.id, &attendee("Grace")).await.unwrap();
    let linus = svc.create_attendee(e.id, &attendee("Linus")).await.unwrap();

    let first = vec![seat(t.id, ada.id, 1), seat(t.id, grace.id, 0)];
    let second = vec![seat(t.id, linus.id, 0)];
    let (r1, r2) = tokio::join!(
        svc.bulk_create_assignments(e.id, &first),
        svc.bulk_create_assignments(e.id, &second),
    );

    assert!(r1.is_ok() != r2.is_ok());
    let loser = if r1.is_err() { r1.unwrap_err() } else { r2.unwrap_err() };
    assert!(matches!(loser, AppError::SeatAlreadyTaken { seat_index: 0, .. }));

    let seated = svc.list_assignments(e.id).await.unwrap();
    assert_eq!(seated.iter().filter(|a| a.seat_index == 0).count(), 1);
}

#[sqlx::test]
async fn meeting_date_can_be_cleared_or_left_alone(pool: PgPool) {
    let svc = service(pool);
    let date = chrono::NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
    let m = svc.create_meeting(Some("E1".into()), None, Some(date)).await.unwrap();

    let renamed = svc.update_meeting(m.id, None, Some("Gala"), None).await.unwrap();
    assert_eq!(renamed.date, Some(date));

    let cleared = svc.update_meeting(m.id, None, None, Some(None)).await.unwrap();
    assert_eq!(cleared.date, None);
    assert_eq!(cleared.title, "Gala");
}
