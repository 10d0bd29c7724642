pub mod course;
pub mod search;
pub mod semester;

pub use course::{Course, Section, SectionsDocument};
pub use search::SearchResult;
pub use semester::{InvalidSemesterId, LatestSemester, Semester, SemesterId};
