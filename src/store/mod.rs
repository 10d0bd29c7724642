//! Read-only access to the course catalog.
//!
//! Backends expose lookup primitives only (literal prefix/substring match,
//! natural-order skip/limit and batched id lookup). Ranking lives in
//! [`crate::services::search_engine`].

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Course, SectionsDocument, Semester, SemesterId};

pub use memory::MemoryCourseStore;
pub use sqlite::SqliteCourseStore;

/// Course lookup within one semester.
///
/// A document matches when its code starts with `code_prefix` (case-sensitive)
/// or its name contains `name_contains` (case-insensitive). Both are literal
/// text, never patterns. Matches come back in store-natural order with
/// `skip`/`limit` applied last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseQuery {
    pub code_prefix: Option<String>,
    pub name_contains: String,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl CourseQuery {
    pub fn by_name(needle: impl Into<String>) -> Self {
        Self {
            code_prefix: None,
            name_contains: needle.into(),
            skip: 0,
            limit: None,
        }
    }

    pub fn by_code_or_name(prefix: impl Into<String>, needle: impl Into<String>) -> Self {
        Self {
            code_prefix: Some(prefix.into()),
            ..Self::by_name(needle)
        }
    }

    pub fn page(mut self, skip: usize, limit: usize) -> Self {
        self.skip = skip;
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, course: &Course) -> bool {
        self.matches_fields(&course.id, &course.name)
    }

    /// Same test as [`CourseQuery::matches`] on a bare code and name.
    pub fn matches_fields(&self, id: &str, name: &str) -> bool {
        let by_code = self
            .code_prefix
            .as_deref()
            .is_some_and(|prefix| id.starts_with(prefix));
        by_code || contains_ignore_case(name, &self.name_contains)
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;

    async fn list_semesters(&self) -> Result<Vec<Semester>, AppError>;

    async fn semester_exists(&self, semester: SemesterId) -> Result<bool, AppError>;

    async fn find_courses(
        &self,
        semester: SemesterId,
        query: &CourseQuery,
    ) -> Result<Vec<Course>, AppError>;

    /// One round trip for the whole id set; ids without a document are simply absent.
    async fn find_sections(
        &self,
        semester: SemesterId,
        course_ids: &[String],
    ) -> Result<Vec<SectionsDocument>, AppError>;
}
