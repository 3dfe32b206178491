use crate::{
    auth::CurrentUser,
    dtos::{
        class::{ClassDetail, ClassListItem, ClassQueryParams, ClassResponse},
        common::{ErrorResponse, MessageResponse},
        student::StudentResponse,
        timetable::entry_responses,
    },
    error::ApiError,
    extract::{Id, Params, Payload},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use database::{entities::classes, services::class::{ClassFilter, ClassService}};
use models::forms::{ClassChanges, NewClass};
use uuid::Uuid;

/// List classes ordered by program, year and division
#[utoipa::path(
    get,
    path = "/classes",
    params(ClassQueryParams),
    responses(
        (status = 200, description = "Classes with student and timetable entry counts", body = [ClassListItem]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Classes"
)]
pub async fn list_classes(
    State(state): State<AppState>,
    _user: CurrentUser,
    Params(params): Params<ClassQueryParams>,
) -> Result<Json<Vec<ClassListItem>>, ApiError> {
    let classes = ClassService::list(&state.db, &ClassFilter::from(params)).await?;

    Ok(Json(classes.into_iter().map(ClassListItem::from).collect()))
}

/// Get a class with its students and timetable
#[utoipa::path(
    get,
    path = "/classes/{id}",
    params(("id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class found", body = ClassDetail),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Classes"
)]
pub async fn get_class(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id, _): Id<classes::Entity>,
) -> Result<Json<ClassDetail>, ApiError> {
    let (class, students, entries) = ClassService::get(&state.db, id).await?;

    Ok(Json(ClassDetail {
        class: class.into(),
        students: students.into_iter().map(StudentResponse::from).collect(),
        timetable_entries: entry_responses(entries),
    }))
}

/// Create a class
#[utoipa::path(
    post,
    path = "/classes",
    request_body = NewClass,
    responses(
        (status = 201, description = "Class created", body = ClassResponse),
        (status = 400, description = "Invalid or duplicate class", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Classes"
)]
pub async fn create_class(
    State(state): State<AppState>,
    user: CurrentUser,
    Payload(class): Payload<NewClass>,
) -> Result<(StatusCode, Json<ClassResponse>), ApiError> {
    user.require_admin()?;
    let class = ClassService::create(&state.db, class).await?;

    Ok((StatusCode::CREATED, Json(class.into())))
}

/// Update a class
#[utoipa::path(
    patch,
    path = "/classes/{id}",
    params(("id" = Uuid, Path, description = "Class ID")),
    request_body = ClassChanges,
    responses(
        (status = 200, description = "Class updated", body = ClassResponse),
        (status = 400, description = "Invalid or duplicate class", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Classes"
)]
pub async fn update_class(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<classes::Entity>,
    Payload(changes): Payload<ClassChanges>,
) -> Result<Json<ClassResponse>, ApiError> {
    user.require_admin()?;
    let class = ClassService::update(&state.db, id, changes).await?;

    Ok(Json(class.into()))
}

/// Delete a class with no students and no timetable entries
#[utoipa::path(
    delete,
    path = "/classes/{id}",
    params(("id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 400, description = "Class still has students or entries", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Classes"
)]
pub async fn delete_class(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<classes::Entity>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require_admin()?;
    ClassService::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Class deleted successfully")))
}
