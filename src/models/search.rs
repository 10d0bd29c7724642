use serde::{Deserialize, Serialize};

use super::Course;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub size: usize,
    pub courses: Vec<Course>,
}

impl SearchResult {
    pub fn new(courses: Vec<Course>) -> Self {
        Self {
            size: courses.len(),
            courses,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}
