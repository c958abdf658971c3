//! Database schema initialization

use sqlx::SqlitePool;

use crate::error::Result;

/// Initialize the database schema
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA_SQL).execute(pool).await?;

    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Annotation types table (teacher-owned catalog of named, colored categories)
CREATE TABLE IF NOT EXISTS annotation_types (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    name TEXT NOT NULL,
    color TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_annotation_types_owner ON annotation_types(owner_id);

-- Annotations table (typed inline comments on essay responses)
CREATE TABLE IF NOT EXISTS annotations (
    id TEXT PRIMARY KEY,
    response_id TEXT NOT NULL,
    -- Character offsets into the response text, half-open [start, end)
    start_pos INTEGER NOT NULL,
    end_pos INTEGER NOT NULL,
    -- Reference into annotation_types; resolved at render time so type
    -- edits propagate without touching annotation rows
    type_id TEXT NOT NULL,
    comment TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_annotations_response ON annotations(response_id);
CREATE INDEX IF NOT EXISTS idx_annotations_type ON annotations(type_id);
"#;
