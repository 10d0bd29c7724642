use std::sync::Arc;

use tracing::debug;

use crate::error::AppError;
use crate::models::{Course, SemesterId};
use crate::services::classifier::{QueryKind, classify};
use crate::store::{CourseQuery, CourseStore};

pub const RESULT_LIMIT: usize = 20;

/// 0 when the course code starts with `prefix`, 1 otherwise.
pub fn prefix_rank(course: &Course, prefix: &str) -> u8 {
    if course.id.starts_with(prefix) { 0 } else { 1 }
}

/// Sorts by (prefix rank, course code).
pub fn rank_by_prefix(courses: &mut [Course], prefix: &str) {
    courses.sort_by(|a, b| {
        prefix_rank(a, prefix)
            .cmp(&prefix_rank(b, prefix))
            .then_with(|| a.id.cmp(&b.id))
    });
}

fn paginate(courses: Vec<Course>, offset: usize, limit: usize) -> Vec<Course> {
    courses.into_iter().skip(offset).take(limit).collect()
}

pub struct CourseSearchEngine {
    store: Arc<dyn CourseStore>,
    limit: usize,
}

impl CourseSearchEngine {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self {
            store,
            limit: RESULT_LIMIT,
        }
    }

    /// One page of courses for a non-empty query.
    pub async fn search(
        &self,
        semester: SemesterId,
        query: &str,
        offset: usize,
    ) -> Result<Vec<Course>, AppError> {
        let trimmed = query.trim();
        let kind = classify(trimmed);
        debug!("query {:?} classified as {:?}", trimmed, kind);

        match kind {
            QueryKind::StructuredCode(_) => {
                let prefix = trimmed.to_uppercase();
                let mut candidates = self
                    .store
                    .find_courses(semester, &CourseQuery::by_code_or_name(&prefix, trimmed))
                    .await?;
                rank_by_prefix(&mut candidates, &prefix);
                Ok(paginate(candidates, offset, self.limit))
            }
            QueryKind::FreeText => {
                self.store
                    .find_courses(
                        semester,
                        &CourseQuery::by_name(trimmed).page(offset, self.limit),
                    )
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCourseStore;

    fn fall() -> SemesterId {
        SemesterId::new(202508).unwrap()
    }

    fn ids(courses: &[Course]) -> Vec<&str> {
        courses.iter().map(|c| c.id.as_str()).collect()
    }

    fn is_prefix_ranked(courses: &[Course], prefix: &str) -> bool {
        courses.windows(2).all(|pair| {
            let key = |c: &Course| (prefix_rank(c, prefix), c.id.clone());
            key(&pair[0]) <= key(&pair[1])
        })
    }

    fn catalog(entries: &[(&str, &str)]) -> Arc<MemoryCourseStore> {
        let store = MemoryCourseStore::new().with_semester(fall(), true);
        for (id, name) in entries {
            store.add_course(fall(), Course::new(*id, *name));
        }
        Arc::new(store)
    }

    #[test]
    fn rank_sorts_prefix_matches_first_then_by_code() {
        let mut courses = vec![
            Course::new("ENGL393", "Writing about CMSC"),
            Course::new("CMSC216", "Computer Systems"),
            Course::new("AAST100", "Intro to CMSC history"),
            Course::new("CMSC131", "OOP I"),
        ];
        rank_by_prefix(&mut courses, "CMSC");
        assert_eq!(ids(&courses), ["CMSC131", "CMSC216", "AAST100", "ENGL393"]);
        assert!(is_prefix_ranked(&courses, "CMSC"));
    }

    #[tokio::test]
    async fn structured_query_ranks_code_prefix_above_title_match() {
        let store = catalog(&[
            ("ENGL393", "Technical Writing for CS21 students"),
            ("CS2110", "Object-Oriented Programming"),
            ("CS2100", "Data Structures"),
            ("MATH140", "Calculus I"),
        ]);
        let engine = CourseSearchEngine::new(store);

        let page = engine.search(fall(), "cs21", 0).await.unwrap();
        assert_eq!(ids(&page), ["CS2100", "CS2110", "ENGL393"]);
    }

    #[tokio::test]
    async fn structured_query_pages_after_sorting() {
        let entries: Vec<(String, String)> = (0..25)
            .rev()
            .map(|n| (format!("CMSC{:03}", 100 + n), format!("Course {n}")))
            .collect();
        let store = MemoryCourseStore::new();
        for (id, name) in &entries {
            store.add_course(fall(), Course::new(id.as_str(), name.as_str()));
        }
        let engine = CourseSearchEngine::new(Arc::new(store));

        let first = engine.search(fall(), "CMSC", 0).await.unwrap();
        assert_eq!(first.len(), RESULT_LIMIT);
        assert_eq!(first[0].id, "CMSC100");
        assert_eq!(first[19].id, "CMSC119");

        let second = engine.search(fall(), "CMSC", 20).await.unwrap();
        assert_eq!(ids(&second), ["CMSC120", "CMSC121", "CMSC122", "CMSC123", "CMSC124"]);

        let past_end = engine.search(fall(), "CMSC", 1_000).await.unwrap();
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn free_text_keeps_store_order() {
        let store = catalog(&[
            ("HIST200", "World History"),
            ("ARTH200", "Art History"),
            ("MATH140", "Calculus I"),
            ("HIST100", "History Methods"),
        ]);
        let engine = CourseSearchEngine::new(store);

        let page = engine.search(fall(), "  history ", 0).await.unwrap();
        assert_eq!(ids(&page), ["HIST200", "ARTH200", "HIST100"]);

        let second = engine.search(fall(), "history", 2).await.unwrap();
        assert_eq!(ids(&second), ["HIST100"]);
    }

    #[tokio::test]
    async fn free_text_treats_metacharacters_literally() {
        let store = catalog(&[
            ("ENEE150", "Intermediate C++ Programming"),
            ("CMSC132", "Object-Oriented Programming II"),
            ("STAT400", "Applied Probability (.*)"),
        ]);
        let engine = CourseSearchEngine::new(store);

        assert_eq!(ids(&engine.search(fall(), "c++ prog", 0).await.unwrap()), ["ENEE150"]);
        assert_eq!(ids(&engine.search(fall(), "(.*)", 0).await.unwrap()), ["STAT400"]);
    }
}
