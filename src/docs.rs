// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Meetings ---
        handlers::conference::list_meetings,
        handlers::conference::create_meeting,
        handlers::conference::resolve_meeting,
        handlers::conference::get_meeting,
        handlers::conference::update_meeting,
        handlers::conference::delete_meeting,

        // --- Tables ---
        handlers::conference::list_tables,
        handlers::conference::create_table,
        handlers::conference::bulk_upsert_tables,
        handlers::conference::get_table,
        handlers::conference::update_table,
        handlers::conference::delete_table,

        // --- Attendees ---
        handlers::conference::list_attendees,
        handlers::conference::create_attendee,
        handlers::conference::get_attendee,
        handlers::conference::update_attendee,
        handlers::conference::delete_attendee,

        // --- Assignments ---
        handlers::conference::list_assignments,
        handlers::conference::create_assignment,
        handlers::conference::bulk_create_assignments,
        handlers::conference::clear_assignments,
        handlers::conference::get_assignment,
        handlers::conference::update_assignment,
        handlers::conference::delete_assignment,

        // --- Bootstrap ---
        handlers::conference::bootstrap,

        // --- Tradeshows ---
        handlers::tradeshow::list_shows,
        handlers::tradeshow::create_show,
        handlers::tradeshow::resolve_show,
        handlers::tradeshow::bootstrap,
        handlers::tradeshow::get_show,
        handlers::tradeshow::update_show,
        handlers::tradeshow::delete_show,
        handlers::tradeshow::reset_show,

        // --- Booths ---
        handlers::tradeshow::list_booths,
        handlers::tradeshow::create_booth,
        handlers::tradeshow::bulk_upsert_booths,
        handlers::tradeshow::get_booth,
        handlers::tradeshow::update_booth,
        handlers::tradeshow::delete_booth,

        // --- Exhibitors ---
        handlers::tradeshow::list_exhibitors,
        handlers::tradeshow::create_exhibitor,
        handlers::tradeshow::get_exhibitor,
        handlers::tradeshow::update_exhibitor,
        handlers::tradeshow::delete_exhibitor,
    ),
    components(
        schemas(
            // --- Conference ---
            models::conference::Meeting,
            models::conference::TableType,
            models::conference::Table,
            models::conference::Attendee,
            models::conference::Assignment,
            models::conference::ConferenceSnapshot,

            // --- Tradeshow ---
            models::tradeshow::TradeShow,
            models::tradeshow::Booth,
            models::tradeshow::Exhibitor,
            models::tradeshow::TradeShowSnapshot,

            // --- Responses ---
            models::responses::IdsResponse,
            models::responses::OkResponse,

            // --- Payloads ---
            handlers::conference::MeetingPayload,
            handlers::conference::MeetingPatchPayload,
            handlers::conference::TablePayload,
            handlers::conference::TablePatchPayload,
            handlers::conference::BulkTableItem,
            handlers::conference::BulkTablesPayload,
            handlers::conference::AttendeePayload,
            handlers::conference::AttendeePatchPayload,
            handlers::conference::AssignmentPayload,
            handlers::conference::AssignmentPatchPayload,
            handlers::conference::BulkAssignmentsPayload,
            handlers::tradeshow::ShowPayload,
            handlers::tradeshow::BoothPayload,
            handlers::tradeshow::BoothPatchPayload,
            handlers::tradeshow::BulkBoothItem,
            handlers::tradeshow::BulkBoothsPayload,
            handlers::tradeshow::ExhibitorPayload,
            handlers::tradeshow::ExhibitorPatchPayload,
        )
    ),
    tags(
        (name = "Meetings", description = "Conference events"),
        (name = "Tables", description = "Tables of a meeting and their seats"),
        (name = "Attendees", description = "People to be seated"),
        (name = "Assignments", description = "Attendee to seat assignments"),
        (name = "Bootstrap", description = "Full meeting snapshot for the seating editor"),
        (name = "Tradeshows", description = "Exhibition events, snapshot and reset"),
        (name = "Booths", description = "Booths on the exhibition floor"),
        (name = "Exhibitors", description = "Exhibitors and their booth placement")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_group_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/assignments/bulk"));
        assert!(paths.contains_key("/api/tradeshow/shows/{id}/reset"));
        assert!(paths.contains_key("/api/tradeshow/booths/bulk"));
        assert!(paths.contains_key("/api/bootstrap"));
    }
}
