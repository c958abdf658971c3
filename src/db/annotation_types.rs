//! Annotation-type catalog database operations

use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;
use crate::highlight::{now_rfc3339, StoredAnnotationType, TypeCatalog};

/// Create annotation-type request
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnnotationType {
    pub name: String,
    pub color: String,
}

/// Annotation-type repository
pub struct AnnotationTypeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnnotationTypeRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a specific annotation type
    pub async fn get(&self, id: &str) -> Result<Option<StoredAnnotationType>> {
        let annotation_type = sqlx::query_as::<_, StoredAnnotationType>(
            r#"
            SELECT id, owner_id, name, color, created_at
            FROM annotation_types
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(annotation_type)
    }

    /// List annotation types for an owner
    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<StoredAnnotationType>> {
        let types = sqlx::query_as::<_, StoredAnnotationType>(
            r#"
            SELECT id, owner_id, name, color, created_at
            FROM annotation_types
            WHERE owner_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        Ok(types)
    }

    /// Build the id-keyed lookup catalog the highlight engine consumes
    pub async fn catalog_for_owner(&self, owner_id: &str) -> Result<TypeCatalog> {
        let types = self.list_for_owner(owner_id).await?;
        Ok(TypeCatalog::new(
            types.iter().map(|t| t.to_annotation_type()),
        ))
    }

    /// Create a new annotation type
    pub async fn create(
        &self,
        owner_id: &str,
        data: &CreateAnnotationType,
    ) -> Result<StoredAnnotationType> {
        let annotation_type = StoredAnnotationType {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            name: data.name.clone(),
            color: data.color.clone(),
            created_at: now_rfc3339(),
        };

        sqlx::query(
            r#"
            INSERT INTO annotation_types (id, owner_id, name, color, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&annotation_type.id)
        .bind(&annotation_type.owner_id)
        .bind(&annotation_type.name)
        .bind(&annotation_type.color)
        .bind(&annotation_type.created_at)
        .execute(self.pool)
        .await?;

        Ok(annotation_type)
    }

    /// Delete an annotation type
    ///
    /// Annotations referencing the deleted type are left in place; the
    /// engine resolves them to the fallback color at render time.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM annotation_types WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
