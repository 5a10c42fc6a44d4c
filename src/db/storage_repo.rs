// src/db/storage_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::company::EntityStatus;
use crate::models::storage::{Storage, StorageKind};

#[derive(Clone)]
pub struct StorageRepository {
    pool: PgPool,
}

impl StorageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        created_by: Uuid,
        name: &str,
        description: Option<&str>,
        kind: StorageKind,
        parent_id: Option<Uuid>,
    ) -> Result<Storage, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let storage = sqlx::query_as::<_, Storage>(
            r#"
            INSERT INTO storages (company_id, created_by, name, description, kind, parent_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, company_id, created_by, name, description, kind,
                      parent_id, status, created_at, updated_at
            "#,
        )
        .bind(company_id)
        .bind(created_by)
        .bind(name)
        .bind(description)
        .bind(kind)
        .bind(parent_id)
        .fetch_one(executor)
        .await?;
        Ok(storage)
    }

    pub async fn find_by_id(
        &self,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Storage>, AppError> {
        let maybe = sqlx::query_as::<_, Storage>(
            r#"
            SELECT id, company_id, created_by, name, description, kind,
                   parent_id, status, created_at, updated_at
            FROM storages
            WHERE company_id = $1 AND id = $2
            "#,
        )
        .bind(company_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    /// Resolve um storage pelo uid filtrando pelo tipo esperado (SPACE
    /// para amostras, DRAWER para arquivos). É a busca usada na aplicação
    /// de patches, por isso aceita qualquer executor.
    pub async fn find_by_id_and_kind<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
        kind: StorageKind,
    ) -> Result<Option<Storage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, Storage>(
            r#"
            SELECT id, company_id, created_by, name, description, kind,
                   parent_id, status, created_at, updated_at
            FROM storages
            WHERE company_id = $1 AND id = $2 AND kind = $3
            "#,
        )
        .bind(company_id)
        .bind(id)
        .bind(kind)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    /// Listagem com filtros opcionais de tipo e de pai. `only_active`
    /// esconde tudo que não está ACTIVE (visão de quem não é SUPER_ADMIN).
    pub async fn list(
        &self,
        company_id: Uuid,
        kind: Option<StorageKind>,
        parent_id: Option<Uuid>,
        only_active: bool,
    ) -> Result<Vec<Storage>, AppError> {
        let rows = sqlx::query_as::<_, Storage>(
            r#"
            SELECT id, company_id, created_by, name, description, kind,
                   parent_id, status, created_at, updated_at
            FROM storages
            WHERE company_id = $1
              AND ($2::storage_kind IS NULL OR kind = $2)
              AND ($3::uuid IS NULL OR parent_id = $3)
              AND (NOT $4 OR status = 'ACTIVE')
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .bind(kind)
        .bind(parent_id)
        .bind(only_active)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn save<'e, E>(&self, executor: E, storage: &Storage) -> Result<Storage, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Storage>(
            r#"
            UPDATE storages
            SET name = $3, description = $4, kind = $5, parent_id = $6, updated_at = now()
            WHERE company_id = $1 AND id = $2
            RETURNING id, company_id, created_by, name, description, kind,
                      parent_id, status, created_at, updated_at
            "#,
        )
        .bind(storage.company_id)
        .bind(storage.id)
        .bind(&storage.name)
        .bind(storage.description.as_deref())
        .bind(storage.kind)
        .bind(storage.parent_id)
        .fetch_one(executor)
        .await?;
        Ok(updated)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
        status: EntityStatus,
    ) -> Result<Option<Storage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, Storage>(
            r#"
            UPDATE storages
            SET status = $3, updated_at = now()
            WHERE company_id = $1 AND id = $2
            RETURNING id, company_id, created_by, name, description, kind,
                      parent_id, status, created_at, updated_at
            "#,
        )
        .bind(company_id)
        .bind(id)
        .bind(status)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }
}
