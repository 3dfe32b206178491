use crate::{
    auth::CurrentUser,
    dtos::{
        class::ClassResponse,
        common::{ErrorResponse, MessageResponse},
        student::{StudentDetail, StudentListItem, StudentQueryParams, StudentResponse},
        timetable::entry_responses,
    },
    error::ApiError,
    extract::{Id, Params, Payload},
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode};
use database::{entities::students, services::student::{StudentFilter, StudentService}};
use models::forms::{NewStudent, StudentChanges};
use uuid::Uuid;

/// List students ordered by class and roll number
#[utoipa::path(
    get,
    path = "/students",
    params(StudentQueryParams),
    responses(
        (status = 200, description = "Students with their classes", body = [StudentListItem]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn list_students(
    State(state): State<AppState>,
    _user: CurrentUser,
    Params(params): Params<StudentQueryParams>,
) -> Result<Json<Vec<StudentListItem>>, ApiError> {
    let students = StudentService::list(&state.db, &StudentFilter::from(params)).await?;

    Ok(Json(
        students
            .into_iter()
            .map(|(student, class)| StudentListItem {
                student: student.into(),
                class: class.map(ClassResponse::from),
            })
            .collect(),
    ))
}

/// Get a student with their class timetable
#[utoipa::path(
    get,
    path = "/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student found", body = StudentDetail),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    _user: CurrentUser,
    Id(id, _): Id<students::Entity>,
) -> Result<Json<StudentDetail>, ApiError> {
    let (student, class, entries) = StudentService::get(&state.db, id).await?;

    Ok(Json(StudentDetail {
        student: student.into(),
        class: class.map(ClassResponse::from),
        timetable_entries: entry_responses(entries),
    }))
}

/// Enroll a student in a class
#[utoipa::path(
    post,
    path = "/students",
    request_body = NewStudent,
    responses(
        (status = 201, description = "Student created", body = StudentResponse),
        (status = 400, description = "Invalid or duplicate student, or unknown class", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    user: CurrentUser,
    Payload(student): Payload<NewStudent>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    user.require_admin()?;
    let student = StudentService::create(&state.db, student).await?;

    Ok((StatusCode::CREATED, Json(student.into())))
}

/// Update a student
#[utoipa::path(
    patch,
    path = "/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = StudentChanges,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Invalid or duplicate student, or unknown class", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<students::Entity>,
    Payload(changes): Payload<StudentChanges>,
) -> Result<Json<StudentResponse>, ApiError> {
    user.require_admin()?;
    let student = StudentService::update(&state.db, id, changes).await?;

    Ok(Json(student.into()))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/students/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    user: CurrentUser,
    Id(id, _): Id<students::Entity>,
) -> Result<Json<MessageResponse>, ApiError> {
    user.require_admin()?;
    StudentService::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Student deleted successfully")))
}
