use crate::{
    auth::CurrentUser,
    dtos::{
        common::{ErrorResponse, MessageResponse},
        subject::SubjectResponse,
        teacher::{TeacherDetail, TeacherListItem, TeacherQueryParams, TeacherResponse},
        timetable::entry_responses,
    },
    error::ApiError,
    extract::{Id, Params, Payload},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use database::{entities::teachers, services::teacher::{TeacherFilter, TeacherService}};
use models::forms::{NewTeacher, TeacherChanges};
use uuid::Uuid;

/// List teachers ordered by name
#[utoipa::path(
    get,
    path = "/teachers",
    params(TeacherQueryParams),
    responses(
        (status = 200, description = "Teachers with their timetable entry counts", body = [TeacherListItem]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Teachers"
)]
pub async fn list_teachers(
    State(state): State<AppState>,
    _user: CurrentUser,
    Params(params): Params<TeacherQueryParams>,
) -> Result<Json<Vec<TeacherListItem>>, ApiError> {
    let teachers = TeacherService::list(&state.db, &TeacherFilter::from(params)).await?;

    Ok(Json(
        teachers
            .into_iter()
            .map(|(teacher, entries)| TeacherListItem {
                teacher: teacher.into(),
                timetable_entry_count: entries,
            })
            .collect(),
    ))
}

/// Get a teacher with their subjects and timetable entries
#[utoipa::path(
    get,
    path = "/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher found", body = TeacherDetail),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Teachers"
)]
pub async fn get_teacher(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id, _): Id<teachers::Entity>,
) -> Result<Json<TeacherDetail>, ApiError> {
    let (teacher, subjects, entries) = TeacherService::get(&state.db, id).await?;

    Ok(Json(TeacherDetail {
        teacher: teacher.into(),
        subjects: subjects.into_iter().map(SubjectResponse::from).collect(),
        timetable_entries: entry_responses(entries),
    }))
}

/// Create a teacher
#[utoipa::path(
    post,
    path = "/teachers",
    request_body = NewTeacher,
    responses(
        (status = 201, description = "Teacher created", body = TeacherResponse),
        (status = 400, description = "Invalid or duplicate teacher", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Teachers"
)]
pub async fn create_teacher(
    State(state): State<AppState>,
    user: CurrentUser,
    Payload(teacher): Payload<NewTeacher>,
) -> Result<(StatusCode, Json<TeacherResponse>), ApiError> {
    user.require_admin()?;
    let teacher = TeacherService::create(&state.db, teacher).await?;

    Ok((StatusCode::CREATED, Json(teacher.into())))
}

/// Update a teacher, optionally replacing the subjects they teach
#[utoipa::path(
    patch,
    path = "/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    request_body = TeacherChanges,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherResponse),
        (status = 400, description = "Invalid or duplicate teacher", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Teachers"
)]
pub async fn update_teacher(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<teachers::Entity>,
    Payload(changes): Payload<TeacherChanges>,
) -> Result<Json<TeacherResponse>, ApiError> {
    user.require_admin()?;
    let teacher = TeacherService::update(&state.db, id, changes).await?;

    Ok(Json(teacher.into()))
}

/// Delete a teacher who has no timetable entries
#[utoipa::path(
    delete,
    path = "/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher deleted", body = MessageResponse),
        (status = 400, description = "Teacher is still scheduled", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Teachers"
)]
pub async fn delete_teacher(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<teachers::Entity>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require_admin()?;
    TeacherService::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Teacher deleted successfully")))
}
