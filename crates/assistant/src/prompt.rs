use crate::types::{ChatContext, GenerationInput, TimetableSlot};
use models::forms::SchedulingConstraints;
use serde::Serialize;
use serde_json::Error;

/// Entries beyond this are left out of chat context
pub const CHAT_CONTEXT_ENTRIES: usize = 20;

fn pretty<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    serde_json::to_string_pretty(value)
}

fn constraint_lines(constraints: &SchedulingConstraints, per_class: bool) -> String {
    let max_label = if per_class {
        "Maximum classes per day per class"
    } else {
        "Maximum classes per day"
    };

    format!(
        "- {max_label}: {}\n\
         - Minimum break between classes: {} minutes\n\
         - Preferred start time: {}\n\
         - Preferred end time: {}\n\
         - Avoid back-to-back labs: {}",
        constraints.max_classes_per_day,
        constraints.min_break_between_classes,
        constraints.preferred_start_time,
        constraints.preferred_end_time,
        constraints.avoid_back_to_back_labs,
    )
}

pub fn chat(message: &str, context: Option<&ChatContext>) -> Result<String, Error> {
    let mut context_lines = String::new();

    if let Some(context) = context {
        if !context.timetable.is_empty() {
            let shown = context.timetable.len().min(CHAT_CONTEXT_ENTRIES);
            context_lines.push_str(&format!(
                "\nCURRENT TIMETABLE:\n{}",
                pretty(&context.timetable[..shown])?
            ));
        }
        for (label, names) in [
            ("SUBJECTS", &context.subjects),
            ("TEACHERS", &context.teachers),
            ("ROOMS", &context.rooms),
        ] {
            if !names.is_empty() {
                context_lines.push_str(&format!("\n{label}: {}", names.join(", ")));
            }
        }
    }

    let context_block = if context_lines.is_empty() {
        String::new()
    } else {
        format!("CONTEXT:{context_lines}\n")
    };

    Ok(format!(
        "You are a timetable assistant for a university. You help administrators, \
         teachers and students with scheduling questions.\n\n\
         {context_block}\n\
         USER QUERY: {message}\n\n\
         Give a helpful, concise answer. For questions about conflicts, optimization \
         or timetable analysis, give specific actionable suggestions."
    ))
}

pub fn generate(
    input: &GenerationInput,
    constraints: &SchedulingConstraints,
) -> Result<String, Error> {
    Ok(format!(
        "You are a timetable scheduling expert. Draft a timetable from the data below.\n\n\
         SUBJECTS:\n{subjects}\n\n\
         TEACHERS (with the codes of the subjects they teach):\n{teachers}\n\n\
         ROOMS:\n{rooms}\n\n\
         CLASSES:\n{classes}\n\n\
         AVAILABLE TIME SLOTS:\n{slots}\n\n\
         CONSTRAINTS:\n{constraints}\n\n\
         Reply with a JSON array of entries shaped like:\n\
         [\n  {{\n    \"day\": \"MONDAY\",\n    \"period\": 1,\n    \"startTime\": \"09:00\",\n    \
         \"endTime\": \"10:00\",\n    \"subjectName\": \"Database Management\",\n    \
         \"subjectCode\": \"CS301\",\n    \"teacherName\": \"Prof. Smith\",\n    \
         \"roomName\": \"C-101\",\n    \"className\": \"BTech CS Year 3\"\n  }}\n]\n\n\
         RULES:\n\
         1. A teacher is never in two places at the same time\n\
         2. A room never hosts two classes at the same time\n\
         3. A class never has two subjects at the same time\n\
         4. Practical subjects go to labs\n\
         5. Room capacity is at least the class strength\n\
         6. Spread lessons evenly across the week\n\n\
         Return ONLY the JSON array.",
        subjects = pretty(&input.subjects)?,
        teachers = pretty(&input.teachers)?,
        rooms = pretty(&input.rooms)?,
        classes = pretty(&input.classes)?,
        slots = pretty(&input.time_slots)?,
        constraints = constraint_lines(constraints, true),
    ))
}

pub fn optimize(
    timetable: &[TimetableSlot],
    constraints: &SchedulingConstraints,
) -> Result<String, Error> {
    Ok(format!(
        "You are a timetable optimization expert. Review the timetable below and \
         suggest improvements.\n\n\
         CURRENT TIMETABLE:\n{timetable}\n\n\
         CONSTRAINTS:\n{constraints}\n\n\
         Reply with a JSON array shaped like:\n\
         [\n  {{\n    \"type\": \"conflict\" | \"improvement\" | \"warning\",\n    \
         \"message\": \"What the issue or idea is\",\n    \
         \"affectedSlots\": [\"optional list of affected slots\"],\n    \
         \"suggestedAction\": \"What to do about it\"\n  }}\n]\n\n\
         Look for:\n\
         1. Scheduling conflicts (same teacher or room at the same time)\n\
         2. Uneven teacher workload\n\
         3. Missing breaks between classes\n\
         4. Days that are much heavier than others\n\
         5. Problem patterns such as back-to-back labs\n\n\
         Return ONLY the JSON array.",
        timetable = pretty(timetable)?,
        constraints = constraint_lines(constraints, false),
    ))
}

#[cfg(test)]
mod test {
    use super::*;

    fn slot(period: i32) -> TimetableSlot {
        TimetableSlot {
            day: "MONDAY".into(),
            period,
            start_time: "09:00".into(),
            end_time: "09:50".into(),
            subject_name: "Operating Systems".into(),
            subject_code: "OS".into(),
            teacher_name: "Prof. Rao".into(),
            room_name: "C101".into(),
            class_name: "BTech CE 2024".into(),
        }
    }

    #[test]
    fn test_chat_without_context() {
        let prompt = chat("Who teaches OS?", None).unwrap();
        assert!(prompt.contains("USER QUERY: Who teaches OS?"));
        assert!(!prompt.contains("CONTEXT:"));
    }

    #[test]
    fn test_chat_context_is_capped() {
        let context = ChatContext {
            timetable: (1..=25).map(slot).collect(),
            subjects: vec!["Operating Systems".into(), "Networks".into()],
            teachers: vec![],
            rooms: vec!["C101".into()],
        };
        let prompt = chat("Summarize Monday", Some(&context)).unwrap();

        assert!(prompt.contains("CONTEXT:"));
        assert!(prompt.contains("\"period\": 20"));
        assert!(!prompt.contains("\"period\": 21"));
        assert!(prompt.contains("SUBJECTS: Operating Systems, Networks"));
        assert!(!prompt.contains("TEACHERS:"));
        assert!(prompt.contains("ROOMS: C101"));
    }

    #[test]
    fn test_constraints_rendered() {
        let constraints = SchedulingConstraints {
            max_classes_per_day: 4,
            ..Default::default()
        };
        let prompt = optimize(&[slot(1)], &constraints).unwrap();
        assert!(prompt.contains("- Maximum classes per day: 4"));
        assert!(prompt.contains("- Minimum break between classes: 10 minutes"));
        assert!(prompt.contains("\"subjectCode\": \"OS\""));

        let prompt = generate(&GenerationInput::default(), &constraints).unwrap();
        assert!(prompt.contains("- Maximum classes per day per class: 4"));
        assert!(prompt.contains("- Preferred end time: 17:00"));
    }
}
