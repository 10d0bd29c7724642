use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::error::AppError;
use crate::models::{Course, Section, SectionsDocument, Semester, SemesterId};
use crate::store::{CourseQuery, CourseStore};

#[derive(Debug, FromRow)]
struct SemesterRow {
    id: i64,
    active: bool,
}

#[derive(Debug, FromRow)]
struct CourseRow {
    id: String,
    name: String,
    document: String,
}

#[derive(Debug, FromRow)]
struct SectionsRow {
    course_id: String,
    sections: String,
}

impl TryFrom<SemesterRow> for Semester {
    type Error = AppError;

    fn try_from(row: SemesterRow) -> Result<Self, Self::Error> {
        let id = SemesterId::try_from(row.id).map_err(|e| AppError::Store(e.to_string()))?;
        Ok(Semester {
            id,
            active: row.active,
        })
    }
}

impl TryFrom<CourseRow> for Course {
    type Error = AppError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let mut extra: Map<String, Value> = serde_json::from_str(&row.document).map_err(|e| {
            AppError::Store(format!("malformed document for course {}: {}", row.id, e))
        })?;
        // Columns win over anything duplicated inside the document blob.
        for key in ["_id", "name", "sections"] {
            extra.remove(key);
        }
        Ok(Course {
            id: row.id,
            name: row.name,
            sections: Vec::new(),
            extra,
        })
    }
}

impl TryFrom<SectionsRow> for SectionsDocument {
    type Error = AppError;

    fn try_from(row: SectionsRow) -> Result<Self, Self::Error> {
        let sections: Vec<Section> = serde_json::from_str(&row.sections).map_err(|e| {
            AppError::Store(format!("malformed sections for course {}: {}", row.course_id, e))
        })?;
        Ok(SectionsDocument {
            course_id: row.course_id,
            sections,
        })
    }
}

#[derive(Clone)]
pub struct SqliteCourseStore {
    db: SqlitePool,
}

impl SqliteCourseStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CourseStore for SqliteCourseStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("select 1").execute(&self.db).await?;
        Ok(())
    }

    async fn list_semesters(&self) -> Result<Vec<Semester>, AppError> {
        sqlx::query_as::<_, SemesterRow>("SELECT id, active FROM semesters")
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(Semester::try_from)
            .collect()
    }

    async fn semester_exists(&self, semester: SemesterId) -> Result<bool, AppError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM semesters WHERE id = ?")
            .bind(i64::from(semester.value()))
            .fetch_optional(&self.db)
            .await?;
        Ok(found.is_some())
    }

    async fn find_courses(
        &self,
        semester: SemesterId,
        query: &CourseQuery,
    ) -> Result<Vec<Course>, AppError> {
        // Name matching folds Unicode case, which SQLite's LIKE does not,
        // so filtering happens here over the semester in rowid order.
        let rows = sqlx::query_as::<_, CourseRow>(
            "SELECT id, name, document FROM courses WHERE semester = ? ORDER BY rowid",
        )
        .bind(i64::from(semester.value()))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .filter(|row| query.matches_fields(&row.id, &row.name))
            .skip(query.skip)
            .take(query.limit.unwrap_or(usize::MAX))
            .map(Course::try_from)
            .collect()
    }

    async fn find_sections(
        &self,
        semester: SemesterId,
        course_ids: &[String],
    ) -> Result<Vec<SectionsDocument>, AppError> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT course_id, sections FROM sections WHERE semester = ");
        qb.push_bind(i64::from(semester.value()));
        qb.push(" AND course_id IN (");
        let mut ids = qb.separated(", ");
        for id in course_ids {
            ids.push_bind(id.clone());
        }
        ids.push_unseparated(")");

        qb.build_query_as::<SectionsRow>()
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(SectionsDocument::try_from)
            .collect()
    }
}
