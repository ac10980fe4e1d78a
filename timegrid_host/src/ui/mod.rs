pub mod theme;
pub mod timetable;
