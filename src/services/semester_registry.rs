use std::cmp::max;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{LATEST_SEMESTER_KEY, ResultCache};
use crate::error::AppError;
use crate::models::{LatestSemester, Semester, SemesterId};
use crate::store::CourseStore;

/// Highest active semester id, never below `baseline`.
pub fn latest_active(semesters: &[Semester], baseline: SemesterId) -> SemesterId {
    semesters
        .iter()
        .filter(|s| s.active)
        .map(|s| s.id)
        .fold(baseline, max)
}

pub struct SemesterRegistry {
    store: Arc<dyn CourseStore>,
    cache: ResultCache,
    baseline: SemesterId,
    latest_ttl: Duration,
}

impl SemesterRegistry {
    pub fn new(
        store: Arc<dyn CourseStore>,
        cache: ResultCache,
        baseline: SemesterId,
        latest_ttl: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            baseline,
            latest_ttl,
        }
    }

    pub async fn resolve_latest_active(&self) -> Result<SemesterId, AppError> {
        let semesters = self.store.list_semesters().await?;
        let latest = latest_active(&semesters, self.baseline);
        debug!("resolved latest semester {} from {} records", latest, semesters.len());
        Ok(latest)
    }

    /// `{"latest": "<id>"}`, served from cache when present.
    pub async fn latest_payload(&self) -> Result<Vec<u8>, AppError> {
        self.cache
            .get_or_compute(LATEST_SEMESTER_KEY, self.latest_ttl, || async {
                let latest = self.resolve_latest_active().await?;
                Ok::<_, AppError>(LatestSemester::from(latest))
            })
            .await
    }

    /// Unknown semesters are `Ok(false)`; only store failures are errors.
    pub async fn is_valid_semester(&self, semester: SemesterId) -> Result<bool, AppError> {
        self.store.semester_exists(semester).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{LATEST_SEMESTER_TTL, MemoryCache};
    use crate::store::MemoryCourseStore;

    fn id(n: u32) -> SemesterId {
        SemesterId::new(n).unwrap()
    }

    fn baseline() -> SemesterId {
        SemesterId::BASELINE
    }

    fn semester(n: u32, active: bool) -> Semester {
        Semester { id: id(n), active }
    }

    #[test]
    fn picks_max_active() {
        let semesters = vec![
            semester(202601, true),
            semester(202608, false),
            semester(202512, true),
        ];
        assert_eq!(latest_active(&semesters, baseline()), id(202601));
    }

    #[test]
    fn order_does_not_matter() {
        let mut semesters = vec![
            semester(202512, true),
            semester(202601, true),
            semester(202605, true),
        ];
        let forward = latest_active(&semesters, baseline());
        semesters.reverse();
        assert_eq!(latest_active(&semesters, baseline()), forward);
        semesters.swap(0, 1);
        assert_eq!(latest_active(&semesters, baseline()), forward);
    }

    #[test]
    fn falls_back_to_baseline() {
        assert_eq!(latest_active(&[], baseline()), baseline());
        let inactive = vec![semester(202612, false)];
        assert_eq!(latest_active(&inactive, baseline()), baseline());
    }

    #[test]
    fn baseline_is_a_floor() {
        let older = vec![semester(202501, true), semester(202412, true)];
        assert_eq!(latest_active(&older, baseline()), baseline());

        let mixed = vec![semester(202501, true), semester(202601, true)];
        assert_eq!(latest_active(&mixed, baseline()), id(202601));
    }

    #[tokio::test]
    async fn latest_payload_is_cached() {
        let store = Arc::new(
            MemoryCourseStore::new()
                .with_semester(id(202601), true)
                .with_semester(id(202605), false),
        );
        let cache = ResultCache::new(Arc::new(MemoryCache::new()));
        let registry = SemesterRegistry::new(store.clone(), cache, baseline(), LATEST_SEMESTER_TTL);

        let first = registry.latest_payload().await.unwrap();
        assert_eq!(first, br#"{"latest":"202601"}"#.to_vec());
        let calls = store.call_count();

        store.add_semester(id(202605), true);
        let second = registry.latest_payload().await.unwrap();
        assert_eq!(second, first);
        assert_eq!(store.call_count(), calls);
    }

    #[tokio::test]
    async fn unknown_semester_is_not_valid() {
        let store = Arc::new(MemoryCourseStore::new().with_semester(id(202508), true));
        let cache = ResultCache::new(Arc::new(MemoryCache::new()));
        let registry = SemesterRegistry::new(store, cache, baseline(), LATEST_SEMESTER_TTL);

        assert!(registry.is_valid_semester(id(202508)).await.unwrap());
        assert!(!registry.is_valid_semester(id(999999)).await.unwrap());
    }
}
