use crate::{
    auth::CurrentUser,
    dtos::{
        common::ErrorResponse,
        time_slot::TimeSlotResponse,
        timetable::entry_responses,
        user::{MyScheduleResponse, MyTimetableResponse, UserResponse},
    },
    error::ApiError,
    state::AppState,
};
use axum::{Json, extract::State};
use database::services::{
    class::ClassService,
    student::StudentService,
    teacher::TeacherService,
    time_slot::TimeSlotService,
    timetable::{EntryFilter, TimetableService},
};
use models::enums::UserRole;

/// The caller's account
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Me"
)]
pub async fn me(user: CurrentUser) -> Json<UserResponse> {
    Json(user.0.into())
}

/// The weekly schedule of the teacher linked to the caller
#[utoipa::path(
    get,
    path = "/me/schedule",
    responses(
        (status = 200, description = "Teacher schedule", body = MyScheduleResponse),
        (status = 403, description = "Caller is not a teacher", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Me"
)]
pub async fn my_schedule(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MyScheduleResponse>, ApiError> {
    user.require(&[UserRole::Teacher], "Forbidden")?;

    let Some(teacher) = TeacherService::find_by_user(&state.db, user.0.id).await? else {
        return Ok(Json(MyScheduleResponse::default()));
    };

    let filter = EntryFilter {
        teacher_id: Some(teacher.id),
        ..Default::default()
    };
    let entries = TimetableService::list(&state.db, &filter).await?;
    let time_slots = TimeSlotService::all(&state.db).await?;

    Ok(Json(MyScheduleResponse {
        teacher: Some(teacher.into()),
        timetable_entries: entry_responses(entries),
        time_slots: time_slots.into_iter().map(TimeSlotResponse::from).collect(),
    }))
}

/// The timetable of the class the caller's student record belongs to
#[utoipa::path(
    get,
    path = "/me/timetable",
    responses(
        (status = 200, description = "Class timetable", body = MyTimetableResponse),
        (status = 403, description = "Caller is not a student", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Me"
)]
pub async fn my_timetable(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MyTimetableResponse>, ApiError> {
    user.require(&[UserRole::Student], "Forbidden")?;

    let Some(student) = StudentService::find_by_user(&state.db, user.0.id).await? else {
        return Ok(Json(MyTimetableResponse::default()));
    };

    let class = ClassService::find(&state.db, student.class_id).await?;
    let filter = EntryFilter {
        class_id: Some(class.id),
        ..Default::default()
    };
    let entries = TimetableService::list(&state.db, &filter).await?;
    let time_slots = TimeSlotService::all(&state.db).await?;

    Ok(Json(MyTimetableResponse {
        student: Some(student.into()),
        class: Some(class.into()),
        timetable_entries: entry_responses(entries),
        time_slots: time_slots.into_iter().map(TimeSlotResponse::from).collect(),
    }))
}
