use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::AppError;
use crate::models::{Course, Section, SemesterId};
use crate::store::CourseStore;

/// Attaches live section listings to a page of courses.
pub struct SectionHydrator {
    store: Arc<dyn CourseStore>,
}

impl SectionHydrator {
    pub fn new(store: Arc<dyn CourseStore>) -> Self {
        Self { store }
    }

    /// Sets `sections` on every course using a single batched lookup.
    /// Courses without a sections document get an empty list.
    pub async fn hydrate(&self, courses: &mut [Course], semester: SemesterId) -> Result<(), AppError> {
        if courses.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = courses.iter().map(|c| c.id.clone()).collect();
        let mut by_course: HashMap<String, Vec<Section>> = self
            .store
            .find_sections(semester, &ids)
            .await?
            .into_iter()
            .map(|doc| (doc.course_id, doc.sections))
            .collect();
        debug!("hydrating {} courses, {} with sections", courses.len(), by_course.len());

        for course in courses.iter_mut() {
            course.sections = by_course.remove(&course.id).unwrap_or_default();
        }
        Ok(())
    }
}
