pub mod ai;
pub mod class;
pub mod common;
pub mod dashboard;
pub mod room;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod time_slot;
pub mod timetable;
pub mod user;
