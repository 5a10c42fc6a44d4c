// src/db/sample_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::company::EntityStatus;
use crate::models::request::{AssociationKind, AssociationSnapshot};
use crate::models::sample::Sample;

#[derive(Clone)]
pub struct SampleRepository {
    pool: PgPool,
}

impl SampleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insere a linha completa. O id e os timestamps vêm prontos do seed;
    /// a linha já nasce com o patch aplicado e normalizado.
    pub async fn insert<'e, E>(&self, executor: E, sample: &Sample) -> Result<Sample, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inserted = sqlx::query_as::<_, Sample>(
            r#"
            INSERT INTO samples (
                id, company_id, storage_id, created_by, sample_id, name,
                description, arrival_date, style_no, sku_no, item, fabrication,
                weight, weight_type, color, size, size_type, size_cm, kind,
                category, sub_category, comments, status, is_active,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24,
                    $25, $26)
            RETURNING *
            "#,
        )
        .bind(sample.id)
        .bind(sample.company_id)
        .bind(sample.storage_id)
        .bind(sample.created_by)
        .bind(sample.sample_id.as_deref())
        .bind(&sample.name)
        .bind(sample.description.as_deref())
        .bind(sample.arrival_date)
        .bind(sample.style_no.as_deref())
        .bind(sample.sku_no.as_deref())
        .bind(sample.item.as_deref())
        .bind(sample.fabrication.as_deref())
        .bind(sample.weight)
        .bind(sample.weight_type)
        .bind(sample.color.as_deref())
        .bind(sample.size.as_deref())
        .bind(sample.size_type)
        .bind(sample.size_cm)
        .bind(sample.kind)
        .bind(sample.category.as_deref())
        .bind(sample.sub_category.as_deref())
        .bind(sample.comments.as_deref())
        .bind(sample.status)
        .bind(sample.is_active)
        .bind(sample.created_at)
        .bind(sample.updated_at)
        .fetch_one(executor)
        .await?;
        Ok(inserted)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Sample>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, Sample>(
            r#"
            SELECT * FROM samples
            WHERE company_id = $1 AND id = $2
            "#,
        )
        .bind(company_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    /// Amostras de um storage. Quem não resolve pedidos só enxerga as
    /// visíveis (is_active = true).
    pub async fn list_in_storage(
        &self,
        company_id: Uuid,
        storage_id: Uuid,
        include_inactive: bool,
    ) -> Result<Vec<Sample>, AppError> {
        let rows = sqlx::query_as::<_, Sample>(
            r#"
            SELECT * FROM samples
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

    /// Regrava os campos patcháveis a partir do estado em memória.
    pub async fn save<'e, E>(&self, executor: E, sample: &Sample) -> Result<Sample, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Sample>(
            r#"
            UPDATE samples
            SET storage_id = $3, sample_id = $4, name = $5, description = $6,
                arrival_date = $7, style_no = $8, sku_no = $9, item = $10,
                fabrication = $11, weight = $12, weight_type = $13, color = $14,
                size = $15, size_type = $16, size_cm = $17, kind = $18,
                category = $19, sub_category = $20, comments = $21,
                updated_at = now()
            WHERE company_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(sample.company_id)
        .bind(sample.id)
        .bind(sample.storage_id)
        .bind(sample.sample_id.as_deref())
        .bind(&sample.name)
        .bind(sample.description.as_deref())
        .bind(sample.arrival_date)
        .bind(sample.style_no.as_deref())
        .bind(sample.sku_no.as_deref())
        .bind(sample.item.as_deref())
        .bind(sample.fabrication.as_deref())
        .bind(sample.weight)
        .bind(sample.weight_type)
        .bind(sample.color.as_deref())
        .bind(sample.size.as_deref())
        .bind(sample.size_type)
        .bind(sample.size_cm)
        .bind(sample.kind)
        .bind(sample.category.as_deref())
        .bind(sample.sub_category.as_deref())
        .bind(sample.comments.as_deref())
        .fetch_one(executor)
        .await?;
        Ok(updated)
    }

    /// Liga/desliga a visibilidade (o efeito de aprovar um CREATE).
    pub async fn set_active<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
        active: bool,
    ) -> Result<Option<Sample>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, Sample>(
            r#"
            UPDATE samples
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
    ) -> Result<Option<Sample>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, Sample>(
            r#"
            UPDATE samples
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

    // ---
    // Vínculos (imagens, notas, compradores, projetos)
    // ---
    // A substituição é sempre "apaga tudo + insere os que resolvem":
    // ids que não existem na empresa são descartados em silêncio.

    pub async fn clear_links<'e, E>(
        &self,
        executor: E,
        sample_id: Uuid,
        kind: AssociationKind,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = match kind {
            AssociationKind::Images => "DELETE FROM sample_images WHERE sample_id = $1",
            AssociationKind::Notes => "DELETE FROM sample_notes WHERE sample_id = $1",
            AssociationKind::Buyers => "DELETE FROM sample_buyers WHERE sample_id = $1",
            AssociationKind::Projects => "DELETE FROM sample_projects WHERE sample_id = $1",
        };
        sqlx::query(sql).bind(sample_id).execute(executor).await?;
        Ok(())
    }

    pub async fn insert_links<'e, E>(
        &self,
        executor: E,
        sample_id: Uuid,
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
                r#"INSERT INTO sample_images (sample_id, image_id)
                   SELECT $1, t.id FROM images t
                   WHERE t.company_id = $2 AND t.id = ANY($3)
                   ON CONFLICT DO NOTHING"#
            }
            AssociationKind::Notes => {
                r#"INSERT INTO sample_notes (sample_id, note_id)
                   SELECT $1, t.id FROM notes t
                   WHERE t.company_id = $2 AND t.id = ANY($3)
                   ON CONFLICT DO NOTHING"#
            }
            AssociationKind::Buyers => {
                r#"INSERT INTO sample_buyers (sample_id, buyer_id)
                   SELECT $1, t.id FROM buyers t
                   WHERE t.company_id = $2 AND t.id = ANY($3)
                   ON CONFLICT DO NOTHING"#
            }
            AssociationKind::Projects => {
                r#"INSERT INTO sample_projects (sample_id, project_id)
                   SELECT $1, t.id FROM projects t
                   WHERE t.company_id = $2 AND t.id = ANY($3)
                   ON CONFLICT DO NOTHING"#
            }
        };
        sqlx::query(sql)
            .bind(sample_id)
            .bind(company_id)
            .bind(ids)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Fotografia dos vínculos atuais, usada no defaulting da captura e
    /// nas respostas de detalhe.
    pub async fn linked_ids(&self, sample_id: Uuid) -> Result<AssociationSnapshot, AppError> {
        let images = sqlx::query_scalar::<_, Uuid>(
            "SELECT image_id FROM sample_images WHERE sample_id = $1 ORDER BY image_id",
        )
        .bind(sample_id)
        .fetch_all(&self.pool)
        .await?;
        let notes = sqlx::query_scalar::<_, Uuid>(
            "SELECT note_id FROM sample_notes WHERE sample_id = $1 ORDER BY note_id",
        )
        .bind(sample_id)
        .fetch_all(&self.pool)
        .await?;
        let buyers = sqlx::query_scalar::<_, Uuid>(
            "SELECT buyer_id FROM sample_buyers WHERE sample_id = $1 ORDER BY buyer_id",
        )
        .bind(sample_id)
        .fetch_all(&self.pool)
        .await?;
        let projects = sqlx::query_scalar::<_, Uuid>(
            "SELECT project_id FROM sample_projects WHERE sample_id = $1 ORDER BY project_id",
        )
        .bind(sample_id)
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
