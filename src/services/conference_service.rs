// src/services/conference_service.rs

use chrono::{NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use crate::{
    common::error::AppError,
    db::ConferenceRepository,
    models::conference::{
        Assignment, AssignmentInput, AssignmentPatch, Attendee, AttendeeInput, AttendeePatch,
        ConferenceSnapshot, Meeting, Table, TableInput, TablePatch, TableUpsert,
    },
    services::scope_service::{ScopeRequest, ScopeResolver},
};

/// Builds codes like `C-20250908-0042`.
pub fn make_event_code(prefix: &str, date: NaiveDate, n: i64) -> String {
    format!("{}-{}-{:04}", prefix, date.format("%Y%m%d"), n)
}

/// A seat index must address one of the table's declared seats.
pub fn check_seat_in_range(table: &Table, seat_index: i32) -> Result<(), AppError> {
    if seat_index < 0 || seat_index >= table.seats {
        return Err(AppError::invalid_field(
            "seat_index",
            "out_of_range",
            format!(
                "seat_index {} is outside table {} ({} seats)",
                seat_index, table.label, table.seats
            ),
        ));
    }
    Ok(())
}

/// A table may not shrink below a seat that is already taken.
pub fn check_seats_cover_occupied(table: &Table, highest_occupied: Option<i32>) -> Result<(), AppError> {
    match highest_occupied {
        Some(seat) if seat >= table.seats => Err(AppError::invalid_field(
            "seats",
            "below_occupied_seat",
            format!(
                "table {} has seat {} occupied and needs at least {} seats",
                table.label,
                seat,
                seat + 1
            ),
        )),
        _ => Ok(()),
    }
}

#[derive(Clone)]
pub struct ConferenceService {
    repo: ConferenceRepository,
    scope: ScopeResolver,
    pool: PgPool,
}

impl ConferenceService {
    pub fn new(repo: ConferenceRepository, scope: ScopeResolver, pool: PgPool) -> Self {
        Self { repo, scope, pool }
    }

    pub async fn resolve_meeting(&self, request: &ScopeRequest) -> Result<Meeting, AppError> {
        self.scope.resolve(&self.repo, request).await
    }

    // =========================================================================
    //  MEETINGS
    // =========================================================================

    pub async fn list_meetings(&self) -> Result<Vec<Meeting>, AppError> {
        self.repo.list_meetings(&self.pool).await
    }

    pub async fn get_meeting(&self, id: i64) -> Result<Meeting, AppError> {
        self.repo
            .find_meeting(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("meeting", id))
    }

    /// Without a code, one is generated from today's date and a sequence.
    #[tracing::instrument(skip(self))]
    pub async fn create_meeting(
        &self,
        code: Option<String>,
        title: Option<String>,
        date: Option<NaiveDate>,
    ) -> Result<Meeting, AppError> {
        let code = match code {
            Some(code) => code,
            None => {
                let n = self.repo.next_code_number(&self.pool).await?;
                make_event_code("C", Utc::now().date_naive(), n)
            }
        };
        let title = title.unwrap_or_else(|| code.clone());

        let meeting = self.repo.create_meeting(&self.pool, &code, &title, date).await?;
        tracing::info!(meeting_id = meeting.id, code = %meeting.code, "meeting created");
        Ok(meeting)
    }

    pub async fn update_meeting(
        &self,
        id: i64,
        code: Option<&str>,
        title: Option<&str>,
        date: Option<Option<NaiveDate>>,
    ) -> Result<Meeting, AppError> {
        self.repo
            .update_meeting(&self.pool, id, code, title, date)
            .await?
            .ok_or_else(|| AppError::not_found("meeting", id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_meeting(&self, id: i64) -> Result<(), AppError> {
        if !self.repo.delete_meeting(&self.pool, id).await? {
            return Err(AppError::not_found("meeting", id));
        }
        tracing::info!(meeting_id = id, "meeting deleted with all of its tables, attendees and assignments");
        Ok(())
    }

    // =========================================================================
    //  TABLES
    // =========================================================================

    pub async fn list_tables(&self, meeting_id: i64) -> Result<Vec<Table>, AppError> {
        self.repo.list_tables(&self.pool, meeting_id).await
    }

    pub async fn get_table(&self, meeting_id: i64, id: i64) -> Result<Table, AppError> {
        self.repo
            .find_table(&self.pool, meeting_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("table", id))
    }

    pub async fn create_table(&self, meeting_id: i64, input: &TableInput) -> Result<Table, AppError> {
        self.repo.create_table(&self.pool, meeting_id, input).await
    }

    pub async fn update_table(&self, meeting_id: i64, id: i64, patch: &TablePatch) -> Result<Table, AppError> {
        let mut tx = self.pool.begin().await?;
        let table = self
            .repo
            .update_table(&mut *tx, meeting_id, id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("table", id))?;
        if patch.seats.is_some() {
            self.check_occupied_seats(&mut *tx, &table).await?;
        }
        tx.commit().await?;
        Ok(table)
    }

    /// Run after a write that set `seats`, on the same transaction, so a
    /// failure rolls the write back.
    async fn check_occupied_seats(&self, conn: &mut PgConnection, table: &Table) -> Result<(), AppError> {
        let highest = self.repo.highest_occupied_seat(&mut *conn, table.id).await?;
        check_seats_cover_occupied(table, highest)
    }

    pub async fn delete_table(&self, meeting_id: i64, id: i64) -> Result<(), AppError> {
        if !self.repo.delete_table(&self.pool, meeting_id, id).await? {
            return Err(AppError::not_found("table", id));
        }
        Ok(())
    }

    /// Reconciles a whole floor plan in one transaction. Items with an id
    /// overwrite that table; the rest upsert on (meeting, label). Returns the
    /// resulting ids in input order. Any failing item rolls back the lot.
    #[tracing::instrument(skip(self, items), fields(items = items.len()))]
    pub async fn bulk_upsert_tables(&self, meeting_id: i64, items: Vec<TableUpsert>) -> Result<Vec<i64>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(items.len());

        for item in items {
            let sets_seats = item.table.seats.is_some();
            let table = match item.id {
                Some(id) => self
                    .repo
                    .update_table(&mut *tx, meeting_id, id, &TablePatch::from(item.table))
                    .await?
                    .ok_or_else(|| AppError::not_found("table", id))?,
                None => self.repo.upsert_table_by_label(&mut *tx, meeting_id, &item.table).await?,
            };
            if sets_seats {
                self.check_occupied_seats(&mut *tx, &table).await?;
            }
            ids.push(table.id);
        }

        tx.commit().await?;
        tracing::info!(meeting_id, count = ids.len(), "tables reconciled");
        Ok(ids)
    }

    // =========================================================================
    //  ATTENDEES
    // =========================================================================

    pub async fn list_attendees(&self, meeting_id: i64) -> Result<Vec<Attendee>, AppError> {
        self.repo.list_attendees(&self.pool, meeting_id).await
    }

    pub async fn get_attendee(&self, meeting_id: i64, id: i64) -> Result<Attendee, AppError> {
        self.repo
            .find_attendee(&self.pool, meeting_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("attendee", id))
    }

    pub async fn create_attendee(&self, meeting_id: i64, input: &AttendeeInput) -> Result<Attendee, AppError> {
        self.repo.create_attendee(&self.pool, meeting_id, input).await
    }

    pub async fn update_attendee(&self, meeting_id: i64, id: i64, patch: &AttendeePatch) -> Result<Attendee, AppError> {
        self.repo
            .update_attendee(&self.pool, meeting_id, id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("attendee", id))
    }

    pub async fn delete_attendee(&self, meeting_id: i64, id: i64) -> Result<(), AppError> {
        if !self.repo.delete_attendee(&self.pool, meeting_id, id).await? {
            return Err(AppError::not_found("attendee", id));
        }
        Ok(())
    }

    // =========================================================================
    //  ASSIGNMENTS
    // =========================================================================

    /// Both ends must live in this meeting; anything else reads as "not found".
    async fn check_placement(
        &self,
        conn: &mut PgConnection,
        meeting_id: i64,
        table_id: i64,
        attendee_id: i64,
        seat_index: i32,
    ) -> Result<Table, AppError> {
        let table = self
            .repo
            .find_table(&mut *conn, meeting_id, table_id)
            .await?
            .ok_or_else(|| AppError::not_found("table", table_id))?;

        self.repo
            .find_attendee(&mut *conn, meeting_id, attendee_id)
            .await?
            .ok_or_else(|| AppError::not_found("attendee", attendee_id))?;

        check_seat_in_range(&table, seat_index)?;
        Ok(table)
    }

    /// Validates and inserts on the given connection. The event reference is
    /// copied from the table row.
    async fn place(&self, conn: &mut PgConnection, meeting_id: i64, input: &AssignmentInput) -> Result<Assignment, AppError> {
        let table = self
            .check_placement(&mut *conn, meeting_id, input.table_id, input.attendee_id, input.seat_index)
            .await?;

        self.repo
            .insert_assignment(
                &mut *conn,
                table.meeting_id,
                table.id,
                input.attendee_id,
                input.seat_index,
                &input.status,
            )
            .await
    }

    pub async fn list_assignments(&self, meeting_id: i64) -> Result<Vec<Assignment>, AppError> {
        self.repo.list_assignments(&self.pool, meeting_id).await
    }

    pub async fn get_assignment(&self, meeting_id: i64, id: i64) -> Result<Assignment, AppError> {
        self.repo
            .find_assignment(&self.pool, meeting_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("assignment", id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_assignment(&self, meeting_id: i64, input: &AssignmentInput) -> Result<Assignment, AppError> {
        let mut conn = self.pool.acquire().await?;
        self.place(&mut *conn, meeting_id, input).await
    }

    /// Additive: every item becomes a new row. A seat that is already taken,
    /// in the store or earlier in the same batch, fails the whole batch.
    #[tracing::instrument(skip(self, items), fields(items = items.len()))]
    pub async fn bulk_create_assignments(&self, meeting_id: i64, items: &[AssignmentInput]) -> Result<Vec<i64>, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(items.len());

        for item in items {
            let assignment = self.place(&mut *tx, meeting_id, item).await?;
            ids.push(assignment.id);
        }

        tx.commit().await?;
        tracing::info!(meeting_id, count = ids.len(), "assignments created");
        Ok(ids)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_assignment(
        &self,
        meeting_id: i64,
        id: i64,
        patch: &AssignmentPatch,
    ) -> Result<Assignment, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .repo
            .find_assignment(&mut *tx, meeting_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("assignment", id))?;

        let table_id = patch.table_id.unwrap_or(current.table_id);
        let attendee_id = patch.attendee_id.unwrap_or(current.attendee_id);
        let seat_index = patch.seat_index.unwrap_or(current.seat_index);
        let status = patch.status.clone().unwrap_or(current.status);

        self.check_placement(&mut *tx, meeting_id, table_id, attendee_id, seat_index)
            .await?;

        let updated = self
            .repo
            .update_assignment(&mut *tx, meeting_id, id, table_id, attendee_id, seat_index, &status)
            .await?
            .ok_or_else(|| AppError::not_found("assignment", id))?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete_assignment(&self, meeting_id: i64, id: i64) -> Result<(), AppError> {
        if !self.repo.delete_assignment(&self.pool, meeting_id, id).await? {
            return Err(AppError::not_found("assignment", id));
        }
        Ok(())
    }

    /// Idempotent: clearing an empty meeting removes nothing and succeeds.
    #[tracing::instrument(skip(self))]
    pub async fn clear_assignments(&self, meeting_id: i64) -> Result<u64, AppError> {
        let removed = self.repo.clear_assignments(&self.pool, meeting_id).await?;
        tracing::info!(meeting_id, removed, "assignments cleared");
        Ok(removed)
    }

    // =========================================================================
    //  BOOTSTRAP
    // =========================================================================

    /// Everything a client needs to draw the room, read without a shared snapshot.
    pub async fn bootstrap(&self, meeting: Meeting) -> Result<ConferenceSnapshot, AppError> {
        let attendees = self.repo.list_attendees(&self.pool, meeting.id).await?;
        let tables = self.repo.list_tables(&self.pool, meeting.id).await?;
        let assignments = self.repo.list_assignments(&self.pool, meeting.id).await?;

        Ok(ConferenceSnapshot { meeting, attendees, tables, assignments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::conference::TableType;

    fn table(seats: i32) -> Table {
        Table {
            id: 1,
            meeting_id: 1,
            label: "T1".into(),
            table_type: TableType::Circle,
            seats,
            x: 20,
            y: 20,
        }
    }

    #[test]
    fn seat_index_must_fall_inside_the_table() {
        assert!(check_seat_in_range(&table(6), 0).is_ok());
        assert!(check_seat_in_range(&table(6), 5).is_ok());
        assert!(matches!(check_seat_in_range(&table(6), 6), Err(AppError::ValidationError(_))));
        assert!(check_seat_in_range(&table(6), -1).is_err());
        assert!(check_seat_in_range(&table(0), 0).is_err());
    }

    #[test]
    fn seats_must_cover_the_highest_occupied_seat() {
        assert!(check_seats_cover_occupied(&table(6), None).is_ok());
        assert!(check_seats_cover_occupied(&table(6), Some(5)).is_ok());
        assert!(matches!(
            check_seats_cover_occupied(&table(6), Some(6)),
            Err(AppError::ValidationError(_))
        ));
        assert!(check_seats_cover_occupied(&table(0), Some(0)).is_err());
    }

    #[test]
    fn generated_codes_carry_date_and_padded_counter() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
        assert_eq!(make_event_code("C", date, 42), "C-20250908-0042");
        assert_eq!(make_event_code("T", date, 123456), "T-20250908-123456");
    }
}
