pub mod classifier;
pub mod hydrator;
pub mod search_engine;
pub mod search_service;
pub mod semester_registry;

pub use classifier::{CodeShape, QueryKind, classify};
pub use hydrator::SectionHydrator;
pub use search_engine::{CourseSearchEngine, RESULT_LIMIT};
pub use search_service::{SearchOutcome, SearchService};
pub use semester_registry::SemesterRegistry;
