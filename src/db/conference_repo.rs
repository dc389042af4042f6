// src/db/conference_repo.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{
        db_utils::{foreign_key_violation, unique_violation},
        error::AppError,
    },
    models::conference::{
        Assignment, AssignmentStatus, Attendee, AttendeeInput, AttendeePatch, Meeting, Table,
        TableInput, TablePatch,
    },
    services::scope_service::EventDirectory,
};

/// All reads and writes for meetings and what hangs off them. Every child
/// query is filtered by `meeting_id`.
#[derive(Clone)]
pub struct ConferenceRepository {
    pool: PgPool,
}

fn map_table_write(e: sqlx::Error, label: &str) -> AppError {
    match unique_violation(&e) {
        Some("tables_meeting_label_key") => AppError::LabelAlreadyExists(label.to_string()),
        _ => e.into(),
    }
}

fn map_meeting_write(e: sqlx::Error, code: &str) -> AppError {
    match unique_violation(&e) {
        Some("meetings_code_key") => AppError::EventCodeAlreadyExists(code.to_string()),
        _ => e.into(),
    }
}

fn map_assignment_write(e: sqlx::Error, table_id: i64, attendee_id: i64, seat_index: i32) -> AppError {
    if let Some("assignments_table_seat_key") = unique_violation(&e) {
        return AppError::SeatAlreadyTaken { table_id, seat_index };
    }
    // The row it pointed at vanished between validation and insert.
    match foreign_key_violation(&e) {
        Some("assignments_table_fkey") => AppError::not_found("table", table_id),
        Some("assignments_attendee_fkey") => AppError::not_found("attendee", attendee_id),
        _ => e.into(),
    }
}

impl ConferenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  MEETINGS
    // =========================================================================

    pub async fn list_meetings<'e, E>(&self, executor: E) -> Result<Vec<Meeting>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let meetings = sqlx::query_as::<_, Meeting>("SELECT * FROM meetings ORDER BY id DESC")
            .fetch_all(executor)
            .await?;
        Ok(meetings)
    }

    pub async fn find_meeting<'e, E>(&self, executor: E, id: i64) -> Result<Option<Meeting>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let meeting = sqlx::query_as::<_, Meeting>("SELECT * FROM meetings WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(meeting)
    }

    pub async fn create_meeting<'e, E>(
        &self,
        executor: E,
        code: &str,
        title: &str,
        date: Option<NaiveDate>,
    ) -> Result<Meeting, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Meeting>(
            "INSERT INTO meetings (code, title, date) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(code)
        .bind(title)
        .bind(date)
        .fetch_one(executor)
        .await
        .map_err(|e| map_meeting_write(e, code))
    }

    pub async fn update_meeting<'e, E>(
        &self,
        executor: E,
        id: i64,
        code: Option<&str>,
        title: Option<&str>,
        date: Option<Option<NaiveDate>>,
    ) -> Result<Option<Meeting>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Meeting>(
            r#"
            UPDATE meetings
            SET code  = COALESCE($2, code),
                title = COALESCE($3, title),
                date  = CASE WHEN $4 THEN $5 ELSE date END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(title)
        .bind(date.is_some())
        .bind(date.flatten())
        .fetch_optional(executor)
        .await
        .map_err(|e| map_meeting_write(e, code.unwrap_or_default()))
    }

    pub async fn delete_meeting<'e, E>(&self, executor: E, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM meetings WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Next value of the sequence behind generated event codes.
    pub async fn next_code_number<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let n = sqlx::query_scalar::<_, i64>("SELECT nextval('event_code_seq')")
            .fetch_one(executor)
            .await?;
        Ok(n)
    }

    // =========================================================================
    //  TABLES
    // =========================================================================

    pub async fn list_tables<'e, E>(&self, executor: E, meeting_id: i64) -> Result<Vec<Table>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tables = sqlx::query_as::<_, Table>(
            "SELECT * FROM tables WHERE meeting_id = $1 ORDER BY id ASC",
        )
        .bind(meeting_id)
        .fetch_all(executor)
        .await?;
        Ok(tables)
    }

    pub async fn find_table<'e, E>(
        &self,
        executor: E,
        meeting_id: i64,
        id: i64,
    ) -> Result<Option<Table>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let table = sqlx::query_as::<_, Table>(
            "SELECT * FROM tables WHERE id = $1 AND meeting_id = $2",
        )
        .bind(id)
        .bind(meeting_id)
        .fetch_optional(executor)
        .await?;
        Ok(table)
    }

    pub async fn create_table<'e, E>(
        &self,
        executor: E,
        meeting_id: i64,
        input: &TableInput,
    ) -> Result<Table, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Table>(
            r#"
            INSERT INTO tables (meeting_id, label, table_type, seats, x, y)
            VALUES ($1, $2, $3, COALESCE($4, 6), COALESCE($5, 20), COALESCE($6, 20))
            RETURNING *
            "#,
        )
        .bind(meeting_id)
        .bind(&input.label)
        .bind(input.table_type)
        .bind(input.seats)
        .bind(input.x)
        .bind(input.y)
        .fetch_one(executor)
        .await
        .map_err(|e| map_table_write(e, &input.label))
    }

    /// Insert, or update the table that already carries this label in the meeting.
    pub async fn upsert_table_by_label<'e, E>(
        &self,
        executor: E,
        meeting_id: i64,
        input: &TableInput,
    ) -> Result<Table, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let table = sqlx::query_as::<_, Table>(
            r#"
            INSERT INTO tables (meeting_id, label, table_type, seats, x, y)
            VALUES ($1, $2, $3, COALESCE($4, 6), COALESCE($5, 20), COALESCE($6, 20))
            ON CONFLICT (meeting_id, label)
            DO UPDATE SET
                table_type = EXCLUDED.table_type,
                seats      = COALESCE($4, tables.seats),
                x          = COALESCE($5, tables.x),
                y          = COALESCE($6, tables.y)
            RETURNING *
            "#,
        )
        .bind(meeting_id)
        .bind(&input.label)
        .bind(input.table_type)
        .bind(input.seats)
        .bind(input.x)
        .bind(input.y)
        .fetch_one(executor)
        .await?;
        Ok(table)
    }

    /// Overwrites the given fields. `None` when the table is not in this meeting.
    pub async fn update_table<'e, E>(
        &self,
        executor: E,
        meeting_id: i64,
        id: i64,
        patch: &TablePatch,
    ) -> Result<Option<Table>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Table>(
            r#"
            UPDATE tables
            SET label      = COALESCE($3, label),
                table_type = COALESCE($4, table_type),
                seats      = COALESCE($5, seats),
                x          = COALESCE($6, x),
                y          = COALESCE($7, y)
            WHERE id = $1 AND meeting_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(meeting_id)
        .bind(patch.label.as_deref())
        .bind(patch.table_type)
        .bind(patch.seats)
        .bind(patch.x)
        .bind(patch.y)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_table_write(e, patch.label.as_deref().unwrap_or_default()))
    }

    /// Highest seat index in use at the table, `None` when nobody sits there.
    pub async fn highest_occupied_seat<'e, E>(&self, executor: E, table_id: i64) -> Result<Option<i32>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let seat = sqlx::query_scalar::<_, Option<i32>>(
            "SELECT MAX(seat_index) FROM assignments WHERE table_id = $1",
        )
        .bind(table_id)
        .fetch_one(executor)
        .await?;
        Ok(seat)
    }

    pub async fn delete_table<'e, E>(&self, executor: E, meeting_id: i64, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM tables WHERE id = $1 AND meeting_id = $2")
            .bind(id)
            .bind(meeting_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  ATTENDEES
    // =========================================================================

    pub async fn list_attendees<'e, E>(&self, executor: E, meeting_id: i64) -> Result<Vec<Attendee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let attendees = sqlx::query_as::<_, Attendee>(
            "SELECT * FROM attendees WHERE meeting_id = $1 ORDER BY id ASC",
        )
        .bind(meeting_id)
        .fetch_all(executor)
        .await?;
        Ok(attendees)
    }

    pub async fn find_attendee<'e, E>(
        &self,
        executor: E,
        meeting_id: i64,
        id: i64,
    ) -> Result<Option<Attendee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let attendee = sqlx::query_as::<_, Attendee>(
            "SELECT * FROM attendees WHERE id = $1 AND meeting_id = $2",
        )
        .bind(id)
        .bind(meeting_id)
        .fetch_optional(executor)
        .await?;
        Ok(attendee)
    }

    pub async fn create_attendee<'e, E>(
        &self,
        executor: E,
        meeting_id: i64,
        input: &AttendeeInput,
    ) -> Result<Attendee, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let attendee = sqlx::query_as::<_, Attendee>(
            r#"
            INSERT INTO attendees (meeting_id, full_name, department, position, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(meeting_id)
        .bind(&input.full_name)
        .bind(&input.department)
        .bind(&input.position)
        .bind(&input.note)
        .fetch_one(executor)
        .await?;
        Ok(attendee)
    }

    pub async fn update_attendee<'e, E>(
        &self,
        executor: E,
        meeting_id: i64,
        id: i64,
        patch: &AttendeePatch,
    ) -> Result<Option<Attendee>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let attendee = sqlx::query_as::<_, Attendee>(
            r#"
            UPDATE attendees
            SET full_name  = COALESCE($3, full_name),
                department = COALESCE($4, department),
                position   = COALESCE($5, position),
                note       = COALESCE($6, note)
            WHERE id = $1 AND meeting_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(meeting_id)
        .bind(patch.full_name.as_deref())
        .bind(patch.department.as_deref())
        .bind(patch.position.as_deref())
        .bind(patch.note.as_deref())
        .fetch_optional(executor)
        .await?;
        Ok(attendee)
    }

    pub async fn delete_attendee<'e, E>(&self, executor: E, meeting_id: i64, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM attendees WHERE id = $1 AND meeting_id = $2")
            .bind(id)
            .bind(meeting_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  ASSIGNMENTS
    // =========================================================================

    pub async fn list_assignments<'e, E>(&self, executor: E, meeting_id: i64) -> Result<Vec<Assignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignments = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE meeting_id = $1 ORDER BY table_id, seat_index",
        )
        .bind(meeting_id)
        .fetch_all(executor)
        .await?;
        Ok(assignments)
    }

    pub async fn find_assignment<'e, E>(
        &self,
        executor: E,
        meeting_id: i64,
        id: i64,
    ) -> Result<Option<Assignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assignment = sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE id = $1 AND meeting_id = $2",
        )
        .bind(id)
        .bind(meeting_id)
        .fetch_optional(executor)
        .await?;
        Ok(assignment)
    }

    /// `meeting_id` must be the table's meeting; the composite keys reject anything else.
    pub async fn insert_assignment<'e, E>(
        &self,
        executor: E,
        meeting_id: i64,
        table_id: i64,
        attendee_id: i64,
        seat_index: i32,
        status: &AssignmentStatus,
    ) -> Result<Assignment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO assignments (meeting_id, table_id, attendee_id, seat_index, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(meeting_id)
        .bind(table_id)
        .bind(attendee_id)
        .bind(seat_index)
        .bind(status.as_str())
        .fetch_one(executor)
        .await
        .map_err(|e| map_assignment_write(e, table_id, attendee_id, seat_index))
    }

    pub async fn update_assignment<'e, E>(
        &self,
        executor: E,
        meeting_id: i64,
        id: i64,
        table_id: i64,
        attendee_id: i64,
        seat_index: i32,
        status: &AssignmentStatus,
    ) -> Result<Option<Assignment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE assignments
            SET table_id    = $3,
                attendee_id = $4,
                seat_index  = $5,
                status      = $6,
                updated_at  = now()
            WHERE id = $1 AND meeting_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(meeting_id)
        .bind(table_id)
        .bind(attendee_id)
        .bind(seat_index)
        .bind(status.as_str())
        .fetch_optional(executor)
        .await
        .map_err(|e| map_assignment_write(e, table_id, attendee_id, seat_index))
    }

    pub async fn delete_assignment<'e, E>(&self, executor: E, meeting_id: i64, id: i64) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM assignments WHERE id = $1 AND meeting_id = $2")
            .bind(id)
            .bind(meeting_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Removes every assignment of the meeting. Returns how many went.
    pub async fn clear_assignments<'e, E>(&self, executor: E, meeting_id: i64) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM assignments WHERE meeting_id = $1")
            .bind(meeting_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl EventDirectory for ConferenceRepository {
    type Event = Meeting;
    const RESOURCE: &'static str = "meeting";

    async fn get_or_create_by_code(&self, code: &str, title: &str) -> Result<Meeting, AppError> {
        // DO UPDATE (not DO NOTHING) so the existing row comes back through RETURNING.
        let meeting = sqlx::query_as::<_, Meeting>(
            r#"
            INSERT INTO meetings (code, title)
            VALUES ($1, $2)
            ON CONFLICT (code) DO UPDATE SET code = EXCLUDED.code
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(title)
        .fetch_one(&self.pool)
        .await?;
        Ok(meeting)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Meeting>, AppError> {
        self.find_meeting(&self.pool, id).await
    }

    async fn find_latest(&self) -> Result<Option<Meeting>, AppError> {
        let meeting = sqlx::query_as::<_, Meeting>("SELECT * FROM meetings ORDER BY id DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(meeting)
    }
}
