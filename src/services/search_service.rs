use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::cache::{ResultCache, search_key};
use crate::error::AppError;
use crate::models::{SearchResult, SemesterId};
use crate::services::hydrator::SectionHydrator;
use crate::services::search_engine::CourseSearchEngine;
use crate::services::semester_registry::SemesterRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Serialized `SearchResult`, ready to send.
    Results(Vec<u8>),
    InvalidSemester,
}

pub struct SearchService {
    registry: Arc<SemesterRegistry>,
    engine: CourseSearchEngine,
    hydrator: SectionHydrator,
    cache: ResultCache,
    ttl: Duration,
}

impl SearchService {
    pub fn new(
        registry: Arc<SemesterRegistry>,
        engine: CourseSearchEngine,
        hydrator: SectionHydrator,
        cache: ResultCache,
        ttl: Duration,
    ) -> Self {
        Self {
            registry,
            engine,
            hydrator,
            cache,
            ttl,
        }
    }

    pub async fn search(
        &self,
        raw_semester: &str,
        query: &str,
        offset: usize,
    ) -> Result<SearchOutcome, AppError> {
        if query.trim().is_empty() {
            return Ok(SearchOutcome::Results(serde_json::to_vec(&SearchResult::empty())?));
        }

        let Ok(semester) = raw_semester.parse::<SemesterId>() else {
            debug!("rejecting malformed semester {:?}", raw_semester);
            return Ok(SearchOutcome::InvalidSemester);
        };

        let key = search_key(semester, offset, query);
        let computed = self
            .cache
            .get_or_compute(&key, self.ttl, || self.compute(semester, query, offset))
            .await;

        match computed {
            Ok(bytes) => Ok(SearchOutcome::Results(bytes)),
            Err(AppError::InvalidSemester) => Ok(SearchOutcome::InvalidSemester),
            Err(e) => Err(e),
        }
    }

    async fn compute(
        &self,
        semester: SemesterId,
        query: &str,
        offset: usize,
    ) -> Result<SearchResult, AppError> {
        if !self.registry.is_valid_semester(semester).await? {
            info!("search against unknown semester {}", semester);
            return Err(AppError::InvalidSemester);
        }

        let mut page = self.engine.search(semester, query, offset).await?;
        self.hydrator.hydrate(&mut page, semester).await?;
        Ok(SearchResult::new(page))
    }
}
