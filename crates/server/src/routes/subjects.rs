use crate::{
    auth::CurrentUser,
    dtos::{
        common::{ErrorResponse, MessageResponse},
        subject::{SubjectDetail, SubjectListItem, SubjectQueryParams, SubjectResponse},
        teacher::TeacherResponse,
        timetable::entry_responses,
    },
    error::ApiError,
    extract::{Id, Params, Payload},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use database::{entities::subjects, services::subject::{SubjectFilter, SubjectService}};
use models::forms::{NewSubject, SubjectChanges};
use uuid::Uuid;

/// List subjects ordered by code
#[utoipa::path(
    get,
    path = "/subjects",
    params(SubjectQueryParams),
    responses(
        (status = 200, description = "Subjects with their timetable entry counts", body = [SubjectListItem]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Subjects"
)]
pub async fn list_subjects(
    State(state): State<AppState>,
    _user: CurrentUser,
    Params(params): Params<SubjectQueryParams>,
) -> Result<Json<Vec<SubjectListItem>>, ApiError> {
    let subjects = SubjectService::list(&state.db, &SubjectFilter::from(params)).await?;

    Ok(Json(
        subjects
            .into_iter()
            .map(|(subject, entries)| SubjectListItem {
                subject: subject.into(),
                timetable_entry_count: entries,
            })
            .collect(),
    ))
}

/// Get a subject with its teachers and timetable entries
#[utoipa::path(
    get,
    path = "/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject found", body = SubjectDetail),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Subjects"
)]
pub async fn get_subject(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id, _): Id<subjects::Entity>,
) -> Result<Json<SubjectDetail>, ApiError> {
    let (subject, teachers, entries) = SubjectService::get(&state.db, id).await?;

    Ok(Json(SubjectDetail {
        subject: subject.into(),
        teachers: teachers.into_iter().map(TeacherResponse::from).collect(),
        timetable_entries: entry_responses(entries),
    }))
}

/// Create a subject
#[utoipa::path(
    post,
    path = "/subjects",
    request_body = NewSubject,
    responses(
        (status = 201, description = "Subject created", body = SubjectResponse),
        (status = 400, description = "Invalid or duplicate subject", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Subjects"
)]
pub async fn create_subject(
    State(state): State<AppState>,
    user: CurrentUser,
    Payload(subject): Payload<NewSubject>,
) -> Result<(StatusCode, Json<SubjectResponse>), ApiError> {
    user.require_admin()?;
    let subject = SubjectService::create(&state.db, subject).await?;

    Ok((StatusCode::CREATED, Json(subject.into())))
}

/// Update a subject, optionally replacing the teachers who teach it
#[utoipa::path(
    patch,
    path = "/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    request_body = SubjectChanges,
    responses(
        (status = 200, description = "Subject updated", body = SubjectResponse),
        (status = 400, description = "Invalid or duplicate subject", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Subjects"
)]
pub async fn update_subject(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<subjects::Entity>,
    Payload(changes): Payload<SubjectChanges>,
) -> Result<Json<SubjectResponse>, ApiError> {
    user.require_admin()?;
    let subject = SubjectService::update(&state.db, id, changes).await?;

    Ok(Json(subject.into()))
}

/// Delete a subject that has no timetable entries
#[utoipa::path(
    delete,
    path = "/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject deleted", body = MessageResponse),
        (status = 400, description = "Subject is still scheduled", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Subjects"
)]
pub async fn delete_subject(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<subjects::Entity>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require_admin()?;
    SubjectService::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Subject deleted successfully")))
}
