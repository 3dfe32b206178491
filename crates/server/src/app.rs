use crate::{
    doc::ApiDoc,
    routes::{
        ai, classes, dashboard, health, me, rooms, students, subjects, teachers, time_slots,
        timetable, users,
    },
    state::AppState,
};
use axum::Router;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

/// Routes that require an authenticated caller
pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(rooms::list_rooms, rooms::create_room))
        .routes(routes!(rooms::get_room, rooms::update_room, rooms::delete_room))
        .routes(routes!(subjects::list_subjects, subjects::create_subject))
        .routes(routes!(
            subjects::get_subject,
            subjects::update_subject,
            subjects::delete_subject
        ))
        .routes(routes!(teachers::list_teachers, teachers::create_teacher))
        .routes(routes!(
            teachers::get_teacher,
            teachers::update_teacher,
            teachers::delete_teacher
        ))
        .routes(routes!(classes::list_classes, classes::create_class))
        .routes(routes!(
            classes::get_class,
            classes::update_class,
            classes::delete_class
        ))
        .routes(routes!(students::list_students, students::create_student))
        .routes(routes!(
            students::get_student,
            students::update_student,
            students::delete_student
        ))
        .routes(routes!(
            time_slots::list_time_slots,
            time_slots::create_time_slot
        ))
        .routes(routes!(
            time_slots::get_time_slot,
            time_slots::update_time_slot,
            time_slots::delete_time_slot
        ))
        .routes(routes!(timetable::list_entries, timetable::create_entry))
        .routes(routes!(
            timetable::get_entry,
            timetable::update_entry,
            timetable::delete_entry
        ))
        .routes(routes!(users::list_users, users::change_role))
        .routes(routes!(dashboard::dashboard))
        .routes(routes!(me::me))
        .routes(routes!(me::my_schedule))
        .routes(routes!(me::my_timetable))
        .routes(routes!(ai::chat))
        .routes(routes!(ai::generate))
        .routes(routes!(ai::optimize))
}

/// Routes served without a token
pub fn public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(health::health))
}

/// Builds the service. `authenticate` wraps the protected routes, normally
/// with the token validating layer.
pub fn app<F>(state: AppState, authenticate: F) -> Router
where
    F: FnOnce(Router<AppState>) -> Router<AppState>,
{
    let (api, mut openapi) = api_routes().split_for_parts();
    let (public, public_doc) = public_routes().split_for_parts();
    openapi.merge(public_doc);

    Router::new()
        .merge(public)
        .merge(authenticate(api))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi))
        .layer(CompressionLayer::new())
        .with_state(state)
}
