pub mod availability;
pub mod clock;
pub mod conflict;
pub mod enums;
pub mod forms;
pub mod patch;
