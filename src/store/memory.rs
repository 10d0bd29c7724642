use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{Course, Section, SectionsDocument, Semester, SemesterId};
use crate::store::{CourseQuery, CourseStore};

/// In-process catalog. Counts every call so callers can assert on store traffic.
#[derive(Default)]
pub struct MemoryCourseStore {
    semesters: RwLock<Vec<Semester>>,
    courses: RwLock<HashMap<SemesterId, Vec<Course>>>,
    sections: RwLock<HashMap<SemesterId, HashMap<String, Vec<Section>>>>,
    calls: AtomicUsize,
    section_calls: AtomicUsize,
}

impl MemoryCourseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_semester(self, id: SemesterId, active: bool) -> Self {
        self.add_semester(id, active);
        self
    }

    pub fn add_semester(&self, id: SemesterId, active: bool) {
        let mut semesters = self.semesters.write().unwrap_or_else(|e| e.into_inner());
        semesters.retain(|s| s.id != id);
        semesters.push(Semester { id, active });
    }

    pub fn add_course(&self, semester: SemesterId, course: Course) {
        let mut courses = self.courses.write().unwrap_or_else(|e| e.into_inner());
        let list = courses.entry(semester).or_default();
        list.retain(|c| c.id != course.id);
        list.push(course);
    }

    pub fn add_sections(&self, semester: SemesterId, course_id: &str, sections: Vec<Section>) {
        let mut all = self.sections.write().unwrap_or_else(|e| e.into_inner());
        all.entry(semester)
            .or_default()
            .insert(course_id.to_string(), sections);
    }

    /// Total number of store calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn section_lookup_count(&self) -> usize {
        self.section_calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CourseStore for MemoryCourseStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.record_call();
        Ok(())
    }

    async fn list_semesters(&self) -> Result<Vec<Semester>, AppError> {
        self.record_call();
        let semesters = self.semesters.read().unwrap_or_else(|e| e.into_inner());
        Ok(semesters.clone())
    }

    async fn semester_exists(&self, semester: SemesterId) -> Result<bool, AppError> {
        self.record_call();
        let semesters = self.semesters.read().unwrap_or_else(|e| e.into_inner());
        Ok(semesters.iter().any(|s| s.id == semester))
    }

    async fn find_courses(
        &self,
        semester: SemesterId,
        query: &CourseQuery,
    ) -> Result<Vec<Course>, AppError> {
        self.record_call();
        let courses = self.courses.read().unwrap_or_else(|e| e.into_inner());
        let Some(list) = courses.get(&semester) else {
            return Ok(Vec::new());
        };

        let matched = list
            .iter()
            .filter(|course| query.matches(course))
            .skip(query.skip)
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(matched)
    }

    async fn find_sections(
        &self,
        semester: SemesterId,
        course_ids: &[String],
    ) -> Result<Vec<SectionsDocument>, AppError> {
        self.record_call();
        self.section_calls.fetch_add(1, Ordering::SeqCst);
        let all = self.sections.read().unwrap_or_else(|e| e.into_inner());
        let Some(by_course) = all.get(&semester) else {
            return Ok(Vec::new());
        };

        Ok(course_ids
            .iter()
            .filter_map(|id| {
                by_course.get(id).map(|sections| SectionsDocument {
                    course_id: id.clone(),
                    sections: sections.clone(),
                })
            })
            .collect())
    }
}
