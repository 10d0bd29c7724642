use std::sync::Arc;

use crate::cache::{CacheStore, ResultCache};
use crate::config::AppConfig;
use crate::services::{CourseSearchEngine, SearchService, SectionHydrator, SemesterRegistry};
use crate::store::CourseStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CourseStore>,
    pub registry: Arc<SemesterRegistry>,
    pub search: Arc<SearchService>,
}

impl AppState {
    /// Wires the pipeline around the given store and cache backends.
    pub fn new(
        store: Arc<dyn CourseStore>,
        cache_store: Arc<dyn CacheStore>,
        config: &AppConfig,
    ) -> Self {
        let cache = ResultCache::new(cache_store);
        let registry = Arc::new(SemesterRegistry::new(
            store.clone(),
            cache.clone(),
            config.baseline_semester,
            config.latest_ttl,
        ));
        let search = Arc::new(SearchService::new(
            registry.clone(),
            CourseSearchEngine::new(store.clone()),
            SectionHydrator::new(store.clone()),
            cache,
            config.search_ttl,
        ));

        Self {
            store,
            registry,
            search,
        }
    }
}
