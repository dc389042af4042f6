// src/handlers.rs

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::config::AppState;

pub mod conference;
pub mod tradeshow;

pub fn conference_routes() -> Router<AppState> {
    Router::new()
        .route("/meetings", get(conference::list_meetings).post(conference::create_meeting))
        .route("/meetings/resolve", get(conference::resolve_meeting))
        .route(
            "/meetings/{id}",
            get(conference::get_meeting)
                .patch(conference::update_meeting)
                .delete(conference::delete_meeting),
        )
        .route("/tables", get(conference::list_tables).post(conference::create_table))
        .route("/tables/bulk", post(conference::bulk_upsert_tables))
        .route(
            "/tables/{id}",
            get(conference::get_table)
                .patch(conference::update_table)
                .delete(conference::delete_table),
        )
        .route("/attendees", get(conference::list_attendees).post(conference::create_attendee))
        .route(
            "/attendees/{id}",
            get(conference::get_attendee)
                .patch(conference::update_attendee)
                .delete(conference::delete_attendee),
        )
        .route(
            "/assignments",
            get(conference::list_assignments).post(conference::create_assignment),
        )
        .route("/assignments/bulk", post(conference::bulk_create_assignments))
        .route("/assignments/clear", delete(conference::clear_assignments))
        .route(
            "/assignments/{id}",
            get(conference::get_assignment)
                .patch(conference::update_assignment)
                .delete(conference::delete_assignment),
        )
        .route("/bootstrap", get(conference::bootstrap))
}

pub fn tradeshow_routes() -> Router<AppState> {
    Router::new()
        .route("/shows", get(tradeshow::list_shows).post(tradeshow::create_show))
        .route("/shows/resolve", get(tradeshow::resolve_show))
        .route("/shows/bootstrap", get(tradeshow::bootstrap))
        .route(
            "/shows/{id}",
            get(tradeshow::get_show)
                .patch(tradeshow::update_show)
                .delete(tradeshow::delete_show),
        )
        .route("/shows/{id}/reset", post(tradeshow::reset_show))
        .route("/booths", get(tradeshow::list_booths).post(tradeshow::create_booth))
        .route("/booths/bulk", post(tradeshow::bulk_upsert_booths))
        .route(
            "/booths/{id}",
            get(tradeshow::get_booth)
                .patch(tradeshow::update_booth)
                .delete(tradeshow::delete_booth),
        )
        .route(
            "/exhibitors",
            get(tradeshow::list_exhibitors).post(tradeshow::create_exhibitor),
        )
        .route(
            "/exhibitors/{id}",
            get(tradeshow::get_exhibitor)
                .patch(tradeshow::update_exhibitor)
                .delete(tradeshow::delete_exhibitor),
        )
}
