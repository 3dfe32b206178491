pub mod classes;
pub mod rooms;
pub mod students;
pub mod subjects;
pub mod teacher_subjects;
pub mod teachers;
pub mod time_slots;
pub mod timetable_entries;
pub mod users;
