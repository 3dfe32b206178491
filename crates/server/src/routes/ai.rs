use crate::{
    auth::CurrentUser,
    dtos::{
        ai::{
            ChatRequest, ChatResponse, GenerateRequest, GenerateResponse, OptimizeRequest,
            OptimizeResponse,
        },
        common::ErrorResponse,
    },
    error::ApiError,
    extract::Payload,
    state::AppState,
};
use assistant::{
    AssistantError,
    prompt::CHAT_CONTEXT_ENTRIES,
    tasks,
    types::{
        ChatContext, ClassBrief, GenerationInput, OptimizationSuggestion, RoomBrief, SlotBrief,
        SubjectBrief, SuggestionKind, TeacherBrief, TimetableSlot,
    },
};
use axum::{Json, extract::State};
use database::services::{
    catalog::{CatalogService, SchedulingData},
    class::ClassService,
    timetable::{EntryDetails, EntryFilter, TimetableService},
};
use log::error;
use models::{clock::format_hour_minute, enums::UserRole, forms::Validate};

const NO_ENTRIES: &str =
    "No timetable entries found. Create some entries first to get optimization suggestions.";

fn assistant_failure(
    context: &'static str,
    message: &'static str,
) -> impl FnOnce(AssistantError) -> ApiError {
    move |err| {
        error!("{context}: {err}");
        ApiError::internal(message)
    }
}

/// Flattens a stored entry into the shape the model reads
fn timetable_slot(details: EntryDetails) -> TimetableSlot {
    TimetableSlot {
        day: details.time_slot.day.to_string(),
        period: details.time_slot.period,
        start_time: format_hour_minute(details.time_slot.start_time),
        end_time: format_hour_minute(details.time_slot.end_time),
        subject_name: details.subject.name,
        subject_code: details.subject.code,
        teacher_name: details.teacher.name,
        room_name: details.room.name,
        class_name: details.class.name,
    }
}

fn generation_input(data: SchedulingData, class: ClassBrief) -> GenerationInput {
    GenerationInput {
        subjects: data
            .subjects
            .into_iter()
            .map(|subject| SubjectBrief {
                code: subject.code,
                name: subject.name,
                credits: subject.credits,
                kind: subject.subject_type.to_string(),
            })
            .collect(),
        teachers: data
            .teachers
            .into_iter()
            .map(|(teacher, subjects)| TeacherBrief {
                id: teacher.id.to_string(),
                name: teacher.name,
                subjects,
            })
            .collect(),
        rooms: data
            .rooms
            .into_iter()
            .map(|room| RoomBrief {
                id: room.id.to_string(),
                name: room.name,
                kind: room.room_type.to_string(),
                capacity: room.capacity,
            })
            .collect(),
        classes: vec![class],
        time_slots: data
            .time_slots
            .into_iter()
            .map(|slot| SlotBrief {
                day: slot.day.to_string(),
                period: slot.period,
                start_time: format_hour_minute(slot.start_time),
                end_time: format_hour_minute(slot.end_time),
            })
            .collect(),
    }
}

/// Ask the scheduling assistant a question
#[utoipa::path(
    post,
    path = "/ai/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Empty message", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Assistant request failed", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Assistant"
)]
pub async fn chat(
    State(state): State<AppState>,
    _user: CurrentUser,
    Payload(request): Payload<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    request.validate()?;

    let context = if request.include_context {
        let entries = TimetableService::recent(&state.db, None, CHAT_CONTEXT_ENTRIES as u64).await?;
        let names = CatalogService::names(&state.db).await?;
        Some(ChatContext {
            timetable: entries.into_iter().map(timetable_slot).collect(),
            subjects: names.subjects,
            teachers: names.teachers,
            rooms: names.rooms,
        })
    } else {
        None
    };

    let response = tasks::chat(state.assistant.as_ref(), &request.message, context.as_ref())
        .await
        .map_err(assistant_failure("AI chat failed", "Failed to process chat request"))?;

    Ok(Json(ChatResponse { response }))
}

/// Draft a timetable for a class. Nothing is saved.
#[utoipa::path(
    post,
    path = "/ai/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Suggested timetable", body = GenerateResponse),
        (status = 400, description = "Invalid request or missing scheduling data", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 500, description = "Assistant request failed", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Assistant"
)]
pub async fn generate(
    State(state): State<AppState>,
    user: CurrentUser,
    Payload(request): Payload<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    user.require(&[UserRole::Admin], "Only administrators can generate timetables")?;
    request.validate()?;

    let class_id = request
        .class_id
        .ok_or_else(|| ApiError::bad_request("Class ID is required"))?;
    let class = ClassService::find(&state.db, class_id).await?;
    let data = CatalogService::scheduling_data(&state.db).await?;

    if data.subjects.is_empty() {
        return Err(ApiError::bad_request("No subjects found. Add subjects first."));
    }
    if data.teachers.is_empty() {
        return Err(ApiError::bad_request("No teachers found. Add teachers first."));
    }
    if data.rooms.is_empty() {
        return Err(ApiError::bad_request("No rooms available. Add rooms first."));
    }
    if data.time_slots.is_empty() {
        return Err(ApiError::bad_request(
            "No time slots defined. Add time slots first.",
        ));
    }

    let input = generation_input(
        data,
        ClassBrief {
            id: class.id.to_string(),
            name: class.name.clone(),
            strength: class.strength,
        },
    );
    let timetable = tasks::generate_timetable(state.assistant.as_ref(), &input, &request.constraints)
        .await
        .map_err(assistant_failure(
            "AI timetable generation failed",
            "Failed to generate timetable suggestions",
        ))?;

    Ok(Json(GenerateResponse {
        message: format!(
            "Generated {} timetable entries for {}",
            timetable.len(),
            class.name
        ),
        timetable,
    }))
}

/// Review the current timetable for problems and improvements
#[utoipa::path(
    post,
    path = "/ai/optimize",
    request_body = OptimizeRequest,
    responses(
        (status = 200, description = "Suggestions", body = OptimizeResponse),
        (status = 400, description = "Invalid constraints", body = ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = ErrorResponse),
        (status = 500, description = "Assistant request failed", body = ErrorResponse)
    ),
    security(("jwt" = [])),
    tag = "Assistant"
)]
pub async fn optimize(
    State(state): State<AppState>,
    user: CurrentUser,
    Payload(request): Payload<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, ApiError> {
    user.require(
        &[UserRole::Admin],
        "Only administrators can use optimization features",
    )?;
    request.validate()?;

    let filter = EntryFilter {
        class_id: request.class_id,
        ..Default::default()
    };
    let entries = TimetableService::list(&state.db, &filter).await?;

    if entries.is_empty() {
        return Ok(Json(OptimizeResponse {
            suggestions: vec![OptimizationSuggestion {
                kind: SuggestionKind::Warning,
                message: NO_ENTRIES.to_string(),
                affected_slots: None,
                suggested_action: None,
            }],
        }));
    }

    let timetable: Vec<TimetableSlot> = entries.into_iter().map(timetable_slot).collect();
    let suggestions =
        tasks::suggest_optimizations(state.assistant.as_ref(), &timetable, &request.constraints)
            .await
            .map_err(assistant_failure(
                "AI optimization failed",
                "Failed to generate optimization suggestions",
            ))?;

    Ok(Json(OptimizeResponse { suggestions }))
}
