//! Request payloads for creating and updating timetable resources, with the
//! validation rules each one must pass before it reaches the database.

use crate::{
    clock::parse_hour_minute,
    conflict::Assignment,
    enums::{Day, RoomType, SubjectType, UserRole},
    patch::double_option,
};
use chrono::NaiveTime;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// The first rule a payload broke
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

fn ensure(condition: bool, message: &str) -> Result<(), ValidationError> {
    if condition {
        Ok(())
    } else {
        Err(ValidationError(message.to_string()))
    }
}

fn ensure_some<T>(value: Option<T>, rule: impl FnOnce(T) -> Result<(), ValidationError>) -> Result<(), ValidationError> {
    value.map_or(Ok(()), rule)
}

fn not_blank(value: &str, message: &str) -> Result<(), ValidationError> {
    ensure(!value.trim().is_empty(), message)
}

fn min_chars(value: &str, min: usize, message: &str) -> Result<(), ValidationError> {
    ensure(value.trim().chars().count() >= min, message)
}

fn email(value: &str) -> Result<(), ValidationError> {
    ensure(EMAIL.is_match(value), "Invalid email address")
}

fn hour_minute(value: &str) -> Result<NaiveTime, ValidationError> {
    parse_hour_minute(value).ok_or_else(|| ValidationError("Invalid time format (HH:MM)".into()))
}

fn default_true() -> bool {
    true
}

fn default_credits() -> i32 {
    3
}

fn default_strength() -> i32 {
    60
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewRoom {
    pub name: String,
    pub capacity: i32,
    #[serde(default)]
    pub room_type: RoomType,
    pub building: Option<String>,
    pub floor: Option<i32>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

impl Validate for NewRoom {
    fn validate(&self) -> Result<(), ValidationError> {
        not_blank(&self.name, "Room name is required")?;
        ensure(self.capacity > 0, "Capacity must be a positive integer")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RoomChanges {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub room_type: Option<RoomType>,
    #[serde(default, deserialize_with = "double_option")]
    pub building: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub floor: Option<Option<i32>>,
    pub is_available: Option<bool>,
}

impl Validate for RoomChanges {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_some(self.name.as_deref(), |n| not_blank(n, "Room name is required"))?;
        ensure_some(self.capacity, |c| {
            ensure(c > 0, "Capacity must be a positive integer")
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewSubject {
    pub code: String,
    pub name: String,
    #[serde(default = "default_credits")]
    pub credits: i32,
    #[serde(default)]
    pub subject_type: SubjectType,
}

fn credits(value: i32) -> Result<(), ValidationError> {
    ensure((1..=10).contains(&value), "Credits must be between 1 and 10")
}

impl Validate for NewSubject {
    fn validate(&self) -> Result<(), ValidationError> {
        not_blank(&self.code, "Subject code is required")?;
        min_chars(
            &self.name,
            2,
            "Subject name must be at least 2 characters",
        )?;
        credits(self.credits)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SubjectChanges {
    pub code: Option<String>,
    pub name: Option<String>,
    pub credits: Option<i32>,
    pub subject_type: Option<SubjectType>,
    /// Replaces the set of teachers able to teach this subject
    pub teacher_ids: Option<Vec<Uuid>>,
}

impl Validate for SubjectChanges {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_some(self.code.as_deref(), |c| {
            not_blank(c, "Subject code is required")
        })?;
        ensure_some(self.name.as_deref(), |n| {
            min_chars(n, 2, "Subject name must be at least 2 characters")
        })?;
        ensure_some(self.credits, credits)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewTeacher {
    pub employee_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub designation: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub user_id: Option<Uuid>,
}

impl Validate for NewTeacher {
    fn validate(&self) -> Result<(), ValidationError> {
        not_blank(&self.employee_id, "Employee ID is required")?;
        min_chars(&self.name, 2, "Name must be at least 2 characters")?;
        email(&self.email)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TeacherChanges {
    pub employee_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub department: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub designation: Option<Option<String>>,
    pub is_available: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub user_id: Option<Option<Uuid>>,
    /// Replaces the set of subjects this teacher can teach
    pub subject_ids: Option<Vec<Uuid>>,
}

impl Validate for TeacherChanges {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_some(self.employee_id.as_deref(), |e| {
            not_blank(e, "Employee ID is required")
        })?;
        ensure_some(self.name.as_deref(), |n| {
            min_chars(n, 2, "Name must be at least 2 characters")
        })?;
        ensure_some(self.email.as_deref(), email)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewClass {
    pub name: String,
    pub program: String,
    pub year: i32,
    pub division: Option<String>,
    pub semester: i32,
    #[serde(default = "default_strength")]
    pub strength: i32,
}

fn class_year(value: i32) -> Result<(), ValidationError> {
    ensure((1..=6).contains(&value), "Year must be between 1 and 6")
}

fn semester(value: i32) -> Result<(), ValidationError> {
    ensure((1..=12).contains(&value), "Semester must be between 1 and 12")
}

fn strength(value: i32) -> Result<(), ValidationError> {
    ensure(value > 0, "Strength must be a positive integer")
}

impl Validate for NewClass {
    fn validate(&self) -> Result<(), ValidationError> {
        not_blank(&self.name, "Class name is required")?;
        not_blank(&self.program, "Program is required")?;
        class_year(self.year)?;
        semester(self.semester)?;
        strength(self.strength)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ClassChanges {
    pub name: Option<String>,
    pub program: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub division: Option<Option<String>>,
    pub semester: Option<i32>,
    pub strength: Option<i32>,
}

impl Validate for ClassChanges {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_some(self.name.as_deref(), |n| not_blank(n, "Class name is required"))?;
        ensure_some(self.program.as_deref(), |p| not_blank(p, "Program is required"))?;
        ensure_some(self.year, class_year)?;
        ensure_some(self.semester, semester)?;
        ensure_some(self.strength, strength)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewStudent {
    pub roll_number: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub class_id: Uuid,
    pub user_id: Option<Uuid>,
}

impl Validate for NewStudent {
    fn validate(&self) -> Result<(), ValidationError> {
        not_blank(&self.roll_number, "Roll number is required")?;
        min_chars(&self.name, 2, "Name must be at least 2 characters")?;
        email(&self.email)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StudentChanges {
    pub roll_number: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    pub class_id: Option<Uuid>,
    #[serde(default, deserialize_with = "double_option")]
    pub user_id: Option<Option<Uuid>>,
}

impl Validate for StudentChanges {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_some(self.roll_number.as_deref(), |r| {
            not_blank(r, "Roll number is required")
        })?;
        ensure_some(self.name.as_deref(), |n| {
            min_chars(n, 2, "Name must be at least 2 characters")
        })?;
        ensure_some(self.email.as_deref(), email)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewTimeSlot {
    pub day: Day,
    pub period: i32,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`
    pub end_time: String,
}

fn period(value: i32) -> Result<(), ValidationError> {
    ensure((1..=12).contains(&value), "Period must be between 1 and 12")
}

/// Checks that a slot's bounds are ordered
pub fn time_range(start: NaiveTime, end: NaiveTime) -> Result<(), ValidationError> {
    ensure(start < end, "Start time must be before end time")
}

impl NewTimeSlot {
    /// The parsed `(start, end)` bounds of the slot
    pub fn times(&self) -> Result<(NaiveTime, NaiveTime), ValidationError> {
        Ok((hour_minute(&self.start_time)?, hour_minute(&self.end_time)?))
    }
}

impl Validate for NewTimeSlot {
    fn validate(&self) -> Result<(), ValidationError> {
        period(self.period)?;
        let (start, end) = self.times()?;
        time_range(start, end)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TimeSlotChanges {
    pub day: Option<Day>,
    pub period: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl TimeSlotChanges {
    pub fn start(&self) -> Result<Option<NaiveTime>, ValidationError> {
        self.start_time.as_deref().map(hour_minute).transpose()
    }

    pub fn end(&self) -> Result<Option<NaiveTime>, ValidationError> {
        self.end_time.as_deref().map(hour_minute).transpose()
    }
}

impl Validate for TimeSlotChanges {
    /// The ordering of the merged bounds is checked against the stored slot
    fn validate(&self) -> Result<(), ValidationError> {
        ensure_some(self.period, period)?;
        self.start()?;
        self.end()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewEntry {
    pub class_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    pub time_slot_id: Option<Uuid>,
}

fn required(value: Option<Uuid>, message: &str) -> Result<Uuid, ValidationError> {
    value.ok_or_else(|| ValidationError(message.to_string()))
}

impl NewEntry {
    pub fn assignment(&self) -> Result<Assignment, ValidationError> {
        Ok(Assignment {
            class_id: required(self.class_id, "Class ID is required")?,
            subject_id: required(self.subject_id, "Subject ID is required")?,
            teacher_id: required(self.teacher_id, "Teacher ID is required")?,
            room_id: required(self.room_id, "Room ID is required")?,
            time_slot_id: required(self.time_slot_id, "Time slot ID is required")?,
        })
    }
}

impl Validate for NewEntry {
    fn validate(&self) -> Result<(), ValidationError> {
        self.assignment().map(|_| ())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EntryChanges {
    pub class_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    pub time_slot_id: Option<Uuid>,
}

impl EntryChanges {
    /// Merges the changes over the stored assignment
    pub fn apply(&self, current: &Assignment) -> Assignment {
        Assignment {
            class_id: self.class_id.unwrap_or(current.class_id),
            subject_id: self.subject_id.unwrap_or(current.subject_id),
            teacher_id: self.teacher_id.unwrap_or(current.teacher_id),
            room_id: self.room_id.unwrap_or(current.room_id),
            time_slot_id: self.time_slot_id.unwrap_or(current.time_slot_id),
        }
    }
}

impl Validate for EntryChanges {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RoleChange {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Validate for RoleChange {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

fn default_max_classes_per_day() -> u8 {
    6
}

fn default_min_break() -> u8 {
    10
}

fn default_start_time() -> String {
    "09:00".to_string()
}

fn default_end_time() -> String {
    "17:00".to_string()
}

/// Preferences handed to the assistant when it drafts or reviews a timetable
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SchedulingConstraints {
    #[serde(default = "default_max_classes_per_day")]
    pub max_classes_per_day: u8,
    /// Minutes
    #[serde(default = "default_min_break")]
    pub min_break_between_classes: u8,
    #[serde(default = "default_start_time")]
    pub preferred_start_time: String,
    #[serde(default = "default_end_time")]
    pub preferred_end_time: String,
    #[serde(default = "default_true")]
    pub avoid_back_to_back_labs: bool,
}

impl Default for SchedulingConstraints {
    fn default() -> Self {
        Self {
            max_classes_per_day: default_max_classes_per_day(),
            min_break_between_classes: default_min_break(),
            preferred_start_time: default_start_time(),
            preferred_end_time: default_end_time(),
            avoid_back_to_back_labs: true,
        }
    }
}

impl Validate for SchedulingConstraints {
    fn validate(&self) -> Result<(), ValidationError> {
        ensure(
            (1..=10).contains(&self.max_classes_per_day),
            "Max classes per day must be between 1 and 10",
        )?;
        ensure(
            self.min_break_between_classes <= 60,
            "Minimum break must be between 0 and 60 minutes",
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_room_defaults_and_rules() {
        let room: NewRoom = serde_json::from_str(r#"{"name":"C101","capacity":100}"#).unwrap();
        assert_eq!(room.room_type, RoomType::Classroom);
        assert!(room.is_available);
        assert!(room.validate().is_ok());

        let room: NewRoom = serde_json::from_str(r#"{"name":" ","capacity":0}"#).unwrap();
        assert_eq!(
            room.validate(),
            Err(ValidationError("Room name is required".into()))
        );

        let room: NewRoom = serde_json::from_str(r#"{"name":"C101","capacity":0}"#).unwrap();
        assert_eq!(
            room.validate().unwrap_err().to_string(),
            "Capacity must be a positive integer"
        );
    }

    #[test]
    fn test_subject_credit_range() {
        let subject: NewSubject = serde_json::from_str(r#"{"code":"CN","name":"Networks"}"#).unwrap();
        assert_eq!(subject.credits, 3);
        assert_eq!(subject.subject_type, SubjectType::Theory);
        assert!(subject.validate().is_ok());

        let changes = SubjectChanges {
            credits: Some(11),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
    }

    #[test]
    fn test_teacher_email_checked() {
        let teacher = NewTeacher {
            employee_id: "EMP001".into(),
            name: "Prof. Sharma".into(),
            email: "not-an-email".into(),
            phone: None,
            department: None,
            designation: None,
            is_available: true,
            user_id: None,
        };
        assert_eq!(
            teacher.validate().unwrap_err().0,
            "Invalid email address"
        );
    }

    #[test]
    fn test_class_ranges() {
        let class: NewClass = serde_json::from_str(
            r#"{"name":"BTech CE 2024","program":"BTech CE","year":7,"semester":1}"#,
        )
        .unwrap();
        assert_eq!(class.strength, 60);
        assert_eq!(
            class.validate().unwrap_err().0,
            "Year must be between 1 and 6"
        );
    }

    #[test]
    fn test_time_slot_rules() {
        let slot: NewTimeSlot = serde_json::from_str(
            r#"{"day":"MONDAY","period":1,"startTime":"10:00","endTime":"09:00"}"#,
        )
        .unwrap();
        assert_eq!(
            slot.validate().unwrap_err().0,
            "Start time must be before end time"
        );

        let slot = NewTimeSlot {
            start_time: "9am".into(),
            ..slot
        };
        assert_eq!(slot.validate().unwrap_err().0, "Invalid time format (HH:MM)");

        let changes = TimeSlotChanges {
            period: Some(13),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
    }

    #[test]
    fn test_new_entry_requires_every_reference() {
        let entry = NewEntry {
            class_id: Some(Uuid::new_v4()),
            subject_id: Some(Uuid::new_v4()),
            teacher_id: None,
            room_id: Some(Uuid::new_v4()),
            time_slot_id: Some(Uuid::new_v4()),
        };
        assert_eq!(entry.validate().unwrap_err().0, "Teacher ID is required");
    }

    #[test]
    fn test_entry_changes_merge() {
        let current = NewEntry {
            class_id: Some(Uuid::new_v4()),
            subject_id: Some(Uuid::new_v4()),
            teacher_id: Some(Uuid::new_v4()),
            room_id: Some(Uuid::new_v4()),
            time_slot_id: Some(Uuid::new_v4()),
        }
        .assignment()
        .unwrap();

        let room = Uuid::new_v4();
        let merged = EntryChanges {
            room_id: Some(room),
            ..Default::default()
        }
        .apply(&current);

        assert_eq!(merged.room_id, room);
        assert_eq!(merged.class_id, current.class_id);
        assert_eq!(merged.time_slot_id, current.time_slot_id);
    }

    #[test]
    fn test_constraints_defaults() {
        let constraints: SchedulingConstraints = serde_json::from_str("{}").unwrap();
        assert_eq!(constraints, SchedulingConstraints::default());
        assert_eq!(constraints.preferred_start_time, "09:00");

        let constraints = SchedulingConstraints {
            max_classes_per_day: 0,
            ..Default::default()
        };
        assert!(constraints.validate().is_err());
    }
}
