// src/db/catalog_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::catalog::{Buyer, Image, Note, Project};

// As quatro tabelas de catálogo que os vínculos apontam. Só criação e
// listagem; quem some do catálogo simplesmente deixa de ser vinculável.
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_buyer<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        created_by: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Buyer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let buyer = sqlx::query_as::<_, Buyer>(
            r#"
            INSERT INTO buyers (company_id, created_by, name, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(created_by)
        .bind(name)
        .bind(description)
        .fetch_one(executor)
        .await?;
        Ok(buyer)
    }

    pub async fn list_buyers(&self, company_id: Uuid) -> Result<Vec<Buyer>, AppError> {
        let rows = sqlx::query_as::<_, Buyer>(
            r#"
            SELECT * FROM buyers
            WHERE company_id = $1 AND status <> 'REMOVED'
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create_note<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        created_by: Uuid,
        title: &str,
        content: Option<&str>,
    ) -> Result<Note, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (company_id, created_by, title, content)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(created_by)
        .bind(title)
        .bind(content)
        .fetch_one(executor)
        .await?;
        Ok(note)
    }

    pub async fn list_notes(&self, company_id: Uuid) -> Result<Vec<Note>, AppError> {
        let rows = sqlx::query_as::<_, Note>(
            r#"
            SELECT * FROM notes
            WHERE company_id = $1 AND status <> 'REMOVED'
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create_project<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        created_by: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (company_id, created_by, name, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(created_by)
        .bind(name)
        .bind(description)
        .fetch_one(executor)
        .await?;
        Ok(project)
    }

    pub async fn list_projects(&self, company_id: Uuid) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query_as::<_, Project>(
            r#"
            SELECT * FROM projects
            WHERE company_id = $1 AND status <> 'REMOVED'
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create_image<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        created_by: Uuid,
        label: Option<&str>,
        url: &str,
    ) -> Result<Image, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let image = sqlx::query_as::<_, Image>(
            r#"
            INSERT INTO images (company_id, created_by, label, url)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(created_by)
        .bind(label)
        .bind(url)
        .fetch_one(executor)
        .await?;
        Ok(image)
    }

    pub async fn list_images(&self, company_id: Uuid) -> Result<Vec<Image>, AppError> {
        let rows = sqlx::query_as::<_, Image>(
            r#"
            SELECT * FROM images
            WHERE company_id = $1 AND status <> 'REMOVED'
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
