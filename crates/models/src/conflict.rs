use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// The identities a timetable entry binds together at one time slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Assignment {
    pub class_id: Uuid,
    pub subject_id: Uuid,
    pub teacher_id: Uuid,
    pub room_id: Uuid,
    pub time_slot_id: Uuid,
}

/// The dimension on which two assignments collide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Conflict {
    Class,
    Teacher,
    Room,
}

impl Conflict {
    pub fn message(self) -> &'static str {
        match self {
            Conflict::Class => "Class already has a scheduled entry at this time slot",
            Conflict::Teacher => "Teacher already has a scheduled entry at this time slot",
            Conflict::Room => "Room already has a scheduled entry at this time slot",
        }
    }

    /// Maps a unique-constraint violation message raised by the database back
    /// to the dimension it guards.
    ///
    /// Postgres reports the index name (`uq_timetable_entries_teacher_time_slot`),
    /// SQLite reports the columns (`timetable_entries.teacher_id, ...`); both
    /// mention the dimension by name.
    pub fn from_constraint_message(message: &str) -> Option<Self> {
        if !message.contains("timetable_entries") {
            return None;
        }

        if message.contains("teacher") {
            Some(Conflict::Teacher)
        } else if message.contains("room") {
            Some(Conflict::Room)
        } else if message.contains("class") {
            Some(Conflict::Class)
        } else {
            None
        }
    }
}

impl Display for Conflict {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.message())
    }
}

impl std::error::Error for Conflict {}

impl Assignment {
    /// The first dimension shared with `other` at the same time slot, in
    /// class, teacher, room order
    pub fn collides_with(&self, other: &Assignment) -> Option<Conflict> {
        if self.time_slot_id != other.time_slot_id {
            None
        } else if self.class_id == other.class_id {
            Some(Conflict::Class)
        } else if self.teacher_id == other.teacher_id {
            Some(Conflict::Teacher)
        } else if self.room_id == other.room_id {
            Some(Conflict::Room)
        } else {
            None
        }
    }
}

/// Checks a candidate assignment against the scheduled entries.
///
/// `exclude` names the entry being updated so it never conflicts with its own
/// previous state. When several dimensions collide the class conflict wins,
/// then teacher, then room, regardless of which entries produced them.
pub fn check_conflicts<'a, I>(
    candidate: &Assignment,
    exclude: Option<Uuid>,
    scheduled: I,
) -> Result<(), Conflict>
where
    I: IntoIterator<Item = (Uuid, &'a Assignment)>,
{
    let mut teacher_taken = false;
    let mut room_taken = false;

    for (id, entry) in scheduled {
        if Some(id) == exclude || entry.time_slot_id != candidate.time_slot_id {
            continue;
        }

        if entry.class_id == candidate.class_id {
            return Err(Conflict::Class);
        }
        teacher_taken |= entry.teacher_id == candidate.teacher_id;
        room_taken |= entry.room_id == candidate.room_id;
    }

    if teacher_taken {
        Err(Conflict::Teacher)
    } else if room_taken {
        Err(Conflict::Room)
    } else {
        Ok(())
    }
}
