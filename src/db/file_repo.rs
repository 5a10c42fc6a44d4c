// src/db/file_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::company::EntityStatus;
use crate::models::file::File;
use crate::models::request::{AssociationKind, AssociationSnapshot};

#[derive(Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(&self, executor: E, file: &File) -> Result<File, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inserted = sqlx::query_as::<_, File>(
            r#"
            INSERT INTO files (
                id, company_id, storage_id, created_by, file_id, name,
                comments, status, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(file.id)
        .bind(file.company_id)
        .bind(file.storage_id)
        .bind(file.created_by)
        .bind(file.file_id.as_deref())
        .bind(&file.name)
        .bind(file.comments.as_deref())
        .bind(file.status)
        .bind(file.is_active)
        .bind(file.created_at)
        .bind(file.updated_at)
        .fetch_one(executor)
        .await?;
        Ok(inserted)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<File>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, File>(
            r#"
            SELECT * FROM files
            WHERE company_id = $1 AND id = $2
            "#,
        )
        .bind(company_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    pub async fn list_in_storage(
        &self,
        company_id: Uuid,
        storage_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<File>, AppError> {
        let rows = sqlx::query_as::<_, File>(
            r#"
            SELECT * FROM files
            WHERE company_id = $1 AND storage_id = $2
              AND status = 'ACTIVE'
              AND (is_active OR $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .bind(storage_id)
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn save<'e, E>(&self, executor: E, file: &File) -> Result<File, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, File>(
            r#"
            UPDATE files
            SET storage_id = $3, file_id = $4, name = $5, comments = $6,
                updated_at = now()
            WHERE company_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(file.company_id)
        .bind(file.id)
        .bind(file.storage_id)
        .bind(file.file_id.as_deref())
        .bind(&file.name)
        .bind(file.comments.as_deref())
        .fetch_one(executor)
        .await?;
        Ok(updated)
    }

    pub async fn set_active<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
        active: bool,
    ) -> Result<Option<File>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, File>(
            r#"
            UPDATE files
            SET is_active = $3, updated_at = now()
            WHERE company_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(id)
        .bind(active)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
        status: EntityStatus,
    ) -> Result<Option<File>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, File>(
            r#"
            UPDATE files
            SET status = $3, updated_at = now()
            WHERE company_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(id)
        .bind(status)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    // Mesma mecânica de vínculos das amostras, sobre as tabelas file_*.

    pub async fn clear_links<'e, E>(
        &self,
        executor: E,
        file_id: Uuid,
        kind: AssociationKind,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = match kind {
            AssociationKind::Images => "DELETE FROM file_images WHERE file_id = $1",
            AssociationKind::Notes => "DELETE FROM file_notes WHERE file_id = $1",
            AssociationKind::Buyers => "DELETE FROM file_buyers WHERE file_id = $1",
            AssociationKind::Projects => "DELETE FROM file_projects WHERE file_id = $1",
        };
        sqlx::query(sql).bind(file_id).execute(executor).await?;
        Ok(())
    }

    pub async fn insert_links<'e, E>(
        &self,
        executor: E,
        file_id: Uuid,
        company_id: Uuid,
        kind: AssociationKind,
        ids: &[Uuid],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if ids.is_empty() {
            return Ok(());
        }
        let sql = match kind {
            AssociationKind::Images => {
                r#"INSERT INTO file_images (file_id, image_id)
                   SELECT $1, t.id FROM images t
                   WHERE t.company_id = $2 AND t.id = ANY($3)
                   ON CONFLICT DO NOTHING"#
            }
            AssociationKind::Notes => {
                r#"INSERT INTO file_notes (file_id, note_id)
                   SELECT $1, t.id FROM notes t
                   WHERE t.company_id = $2 AND t.id = ANY($3)
                   ON CONFLICT DO NOTHING"#
            }
            AssociationKind::Buyers => {
                r#"INSERT INTO file_buyers (file_id, buyer_id)
                   SELECT $1, t.id FROM buyers t
                   WHERE t.company_id = $2 AND t.id = ANY($3)
                   ON CONFLICT DO NOTHING"#
            }
            AssociationKind::Projects => {
                r#"INSERT INTO file_projects (file_id, project_id)
                   SELECT $1, t.id FROM projects t
                   WHERE t.company_id = $2 AND t.id = ANY($3)
                   ON CONFLICT DO NOTHING"#
            }
        };
        sqlx::query(sql)
            .bind(file_id)
            .bind(company_id)
            .bind(ids)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn linked_ids(&self, file_id: Uuid) -> Result<AssociationSnapshot, AppError> {
        let images = sqlx::query_scalar::<_, Uuid>(
            "SELECT image_id FROM file_images WHERE file_id = $1 ORDER BY image_id",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await?;
        let notes = sqlx::query_scalar::<_, Uuid>(
            "SELECT note_id FROM file_notes WHERE file_id = $1 ORDER BY note_id",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await?;
        let buyers = sqlx::query_scalar::<_, Uuid>(
            "SELECT buyer_id FROM file_buyers WHERE file_id = $1 ORDER BY buyer_id",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await?;
        let projects = sqlx::query_scalar::<_, Uuid>(
            "SELECT project_id FROM file_projects WHERE file_id = $1 ORDER BY project_id",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(AssociationSnapshot {
            images,
            notes,
            buyers,
            projects,
        })
    }
}
