use serde::{Deserialize, Serialize};

/// One scheduled (or proposed) lesson, flattened to names for the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimetableSlot {
    pub day: String,
    pub period: i32,
    pub start_time: String,
    pub end_time: String,
    pub subject_name: String,
    pub subject_code: String,
    pub teacher_name: String,
    pub room_name: String,
    pub class_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum SuggestionKind {
    Conflict,
    Improvement,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OptimizationSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_slots: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Current state handed to the model alongside a chat message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatContext {
    pub timetable: Vec<TimetableSlot>,
    pub subjects: Vec<String>,
    pub teachers: Vec<String>,
    pub rooms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectBrief {
    pub code: String,
    pub name: String,
    pub credits: i32,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherBrief {
    pub id: String,
    pub name: String,
    /// Codes of the subjects the teacher can take
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomBrief {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub capacity: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassBrief {
    pub id: String,
    pub name: String,
    pub strength: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotBrief {
    pub day: String,
    pub period: i32,
    pub start_time: String,
    pub end_time: String,
}

/// Everything the model needs to draft a timetable
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationInput {
    pub subjects: Vec<SubjectBrief>,
    pub teachers: Vec<TeacherBrief>,
    pub rooms: Vec<RoomBrief>,
    pub classes: Vec<ClassBrief>,
    pub time_slots: Vec<SlotBrief>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_suggestion_wire_format() {
        let suggestion: OptimizationSuggestion = serde_json::from_str(
            r#"{"type":"conflict","message":"Prof. Rao is double booked","affectedSlots":["MONDAY P1"]}"#,
        )
        .unwrap();
        assert_eq!(suggestion.kind, SuggestionKind::Conflict);
        assert_eq!(suggestion.suggested_action, None);

        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(json["type"], "conflict");
        assert!(json.get("suggestedAction").is_none());
    }
}
