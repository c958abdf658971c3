//! Annotation database operations

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::highlight::{now_rfc3339, CreateAnnotation, StoredAnnotation};

/// Annotation repository
pub struct AnnotationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnnotationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a specific annotation
    pub async fn get(&self, id: &str) -> Result<Option<StoredAnnotation>> {
        let annotation = sqlx::query_as::<_, StoredAnnotation>(
            r#"
            SELECT id, response_id, start_pos, end_pos, type_id, comment, created_at
            FROM annotations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(annotation)
    }

    /// List annotations for an essay response, oldest first so list order
    /// (and with it first-wins color) is stable across renders
    pub async fn list_for_response(&self, response_id: &str) -> Result<Vec<StoredAnnotation>> {
        let annotations = sqlx::query_as::<_, StoredAnnotation>(
            r#"
            SELECT id, response_id, start_pos, end_pos, type_id, comment, created_at
            FROM annotations
            WHERE response_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(response_id)
        .fetch_all(self.pool)
        .await?;

        Ok(annotations)
    }

    /// Create a new annotation
    pub async fn create(
        &self,
        response_id: &str,
        data: &CreateAnnotation,
    ) -> Result<StoredAnnotation> {
        let annotation = StoredAnnotation {
            id: Uuid::new_v4().to_string(),
            response_id: response_id.to_string(),
            start_pos: data.start as i64,
            end_pos: data.end as i64,
            type_id: data.type_id.clone(),
            comment: data.comment.clone(),
            created_at: now_rfc3339(),
        };

        sqlx::query(
            r#"
            INSERT INTO annotations (id, response_id, start_pos, end_pos, type_id, comment, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&annotation.id)
        .bind(&annotation.response_id)
        .bind(annotation.start_pos)
        .bind(annotation.end_pos)
        .bind(&annotation.type_id)
        .bind(&annotation.comment)
        .bind(&annotation.created_at)
        .execute(self.pool)
        .await?;

        Ok(annotation)
    }

    /// Delete an annotation
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM annotations WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all annotations for a response
    pub async fn delete_for_response(&self, response_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM annotations WHERE response_id = ?")
            .bind(response_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Count annotations for a response
    pub async fn count_for_response(&self, response_id: &str) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM annotations WHERE response_id = ?")
            .bind(response_id)
            .fetch_one(self.pool)
            .await?;

        Ok(row.0)
    }
}
