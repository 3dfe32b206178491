use assistant::types::{OptimizationSuggestion, TimetableSlot};
use models::forms::{SchedulingConstraints, Validate, ValidationError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Send the current timetable and resource names along with the message
    #[serde(default)]
    pub include_context: bool,
}

impl Validate for ChatRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.message.trim().is_empty() {
            return Err(ValidationError("Message is required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub class_id: Option<Uuid>,
    #[serde(default)]
    pub constraints: SchedulingConstraints,
}

impl Validate for GenerateRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.class_id.is_none() {
            return Err(ValidationError("Class ID is required".to_string()));
        }
        self.constraints.validate()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub timetable: Vec<TimetableSlot>,
    pub message: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    /// Limits the review to one class
    pub class_id: Option<Uuid>,
    #[serde(default)]
    pub constraints: SchedulingConstraints,
}

impl Validate for OptimizeRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        self.constraints.validate()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OptimizeResponse {
    pub suggestions: Vec<OptimizationSuggestion>,
}
