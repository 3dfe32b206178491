pub mod ai;
pub mod classes;
pub mod dashboard;
pub mod health;
pub mod me;
pub mod rooms;
pub mod students;
pub mod subjects;
pub mod teachers;
pub mod time_slots;
pub mod timetable;
pub mod users;
