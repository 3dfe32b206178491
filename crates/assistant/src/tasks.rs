use crate::{
    Assistant, AssistantError, prompt,
    types::{ChatContext, GenerationInput, OptimizationSuggestion, TimetableSlot},
};
use lazy_static::lazy_static;
use models::forms::SchedulingConstraints;
use regex::Regex;
use serde::de::DeserializeOwned;

lazy_static! {
    static ref JSON_ARRAY: Regex = Regex::new(r"\[[\s\S]*\]").unwrap();
}

/// Parses the outermost JSON array in a model reply. A reply with no array
/// yields no items.
pub fn extract_json_array<T: DeserializeOwned>(reply: &str) -> Result<Vec<T>, AssistantError> {
    match JSON_ARRAY.find(reply) {
        Some(array) => Ok(serde_json::from_str(array.as_str())?),
        None => Ok(Vec::new()),
    }
}

pub async fn chat(
    assistant: &dyn Assistant,
    message: &str,
    context: Option<&ChatContext>,
) -> Result<String, AssistantError> {
    assistant.complete(&prompt::chat(message, context)?).await
}

/// Asks the model for a draft timetable. Nothing is persisted.
pub async fn generate_timetable(
    assistant: &dyn Assistant,
    input: &GenerationInput,
    constraints: &SchedulingConstraints,
) -> Result<Vec<TimetableSlot>, AssistantError> {
    let reply = assistant
        .complete(&prompt::generate(input, constraints)?)
        .await?;
    extract_json_array(&reply)
}

pub async fn suggest_optimizations(
    assistant: &dyn Assistant,
    timetable: &[TimetableSlot],
    constraints: &SchedulingConstraints,
) -> Result<Vec<OptimizationSuggestion>, AssistantError> {
    let reply = assistant
        .complete(&prompt::optimize(timetable, constraints)?)
        .await?;
    extract_json_array(&reply)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Unconfigured, types::SuggestionKind};
    use async_trait::async_trait;

    struct Canned(&'static str);

    #[async_trait]
    impl Assistant for Canned {
        async fn complete(&self, _prompt: &str) -> Result<String, AssistantError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_extract_array_from_fenced_reply() {
        let reply = "Here you go:\n```json\n[{\"type\":\"warning\",\"message\":\"Friday is empty\"}]\n```";
        let suggestions: Vec<OptimizationSuggestion> = extract_json_array(reply).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].kind, SuggestionKind::Warning);
    }

    #[test]
    fn test_extract_without_array_is_empty() {
        let slots: Vec<TimetableSlot> = extract_json_array("I could not draft one.").unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn test_extract_malformed_array_fails() {
        let result: Result<Vec<TimetableSlot>, _> = extract_json_array("[{\"day\": }]");
        assert!(matches!(result, Err(AssistantError::Parse(_))));
    }

    #[tokio::test]
    async fn test_generate_parses_slots() {
        let assistant = Canned(
            r#"[{"day":"MONDAY","period":1,"startTime":"09:00","endTime":"09:50",
                "subjectName":"Operating Systems","subjectCode":"OS","teacherName":"Prof. Rao",
                "roomName":"C101","className":"BTech CE 2024"}]"#,
        );
        let slots = generate_timetable(
            &assistant,
            &GenerationInput::default(),
            &SchedulingConstraints::default(),
        )
        .await
        .unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].subject_code, "OS");
    }

    #[tokio::test]
    async fn test_unconfigured_assistant_fails() {
        let result = chat(&Unconfigured, "hello", None).await;
        assert!(matches!(result, Err(AssistantError::NotConfigured)));
    }
}
