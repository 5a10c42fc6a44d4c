// src/db/request_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::request::{
    ModifyRequest, RequestStatus, RequestedAction, RequestedData, RequestedFrom,
};

#[derive(Clone)]
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grava o pedido pendente com o documento de patch cru em JSONB.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        requested_by: Uuid,
        storage_id: Option<Uuid>,
        sample_id: Option<Uuid>,
        file_id: Option<Uuid>,
        requested_from: RequestedFrom,
        requested_action: RequestedAction,
        requested_data: &RequestedData,
    ) -> Result<ModifyRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let request = sqlx::query_as::<_, ModifyRequest>(
            r#"
            INSERT INTO modify_requests (
                company_id, requested_by, storage_id, sample_id, file_id,
                requested_from, requested_action, requested_data
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(requested_by)
        .bind(storage_id)
        .bind(sample_id)
        .bind(file_id)
        .bind(requested_from)
        .bind(requested_action)
        .bind(sqlx::types::Json(requested_data))
        .fetch_one(executor)
        .await?;
        Ok(request)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Option<ModifyRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, ModifyRequest>(
            r#"
            SELECT * FROM modify_requests
            WHERE company_id = $1 AND id = $2
            "#,
        )
        .bind(company_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    /// Todos os pedidos da empresa, mais novos primeiro.
    pub async fn list_company(&self, company_id: Uuid) -> Result<Vec<ModifyRequest>, AppError> {
        let rows = sqlx::query_as::<_, ModifyRequest>(
            r#"
            SELECT * FROM modify_requests
            WHERE company_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Só os pedidos abertos pelo próprio ator (escopo de STAFF).
    pub async fn list_own(
        &self,
        company_id: Uuid,
        requested_by: Uuid,
    ) -> Result<Vec<ModifyRequest>, AppError> {
        let rows = sqlx::query_as::<_, ModifyRequest>(
            r#"
            SELECT * FROM modify_requests
            WHERE company_id = $1 AND requested_by = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .bind(requested_by)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Marca o veredito. `responded_by` fica registrado tanto na aprovação
    /// quanto na rejeição. O filtro por PENDING segura a corrida entre dois
    /// resolutores: o segundo UPDATE não casa linha nenhuma e vira `None`.
    pub async fn mark_resolved<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: RequestStatus,
        responded_by: Uuid,
    ) -> Result<Option<ModifyRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, ModifyRequest>(
            r#"
            UPDATE modify_requests
            SET status = $2, responded_by = $3, updated_at = now()
            WHERE id = $1 AND status = 'PENDING'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(responded_by)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }
}
