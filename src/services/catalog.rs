// src/services/catalog.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::authz,
    common::error::AppError,
    db::{CatalogRepository, CompanyRepository},
    models::catalog::{
        Buyer, CreateBuyerPayload, CreateImagePayload, CreateNotePayload, CreateProjectPayload,
        Image, Note, Project,
    },
    models::company::Membership,
};

// Entidades de catálogo (compradores, notas, projetos, imagens): linhas
// simples referenciadas pelos conjuntos de vínculo de amostras e arquivos.
// Criação segue a tabela de escrita direta; STAFF não cria nem por pedido.
#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
    company_repo: CompanyRepository,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository, company_repo: CompanyRepository, pool: PgPool) -> Self {
        Self {
            catalog_repo,
            company_repo,
            pool,
        }
    }

    pub async fn create_buyer(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        payload: &CreateBuyerPayload,
    ) -> Result<Buyer, AppError> {
        self.require_writer(actor_id, company_id).await?;
        self.catalog_repo
            .create_buyer(
                &self.pool,
                company_id,
                actor_id,
                &payload.name,
                payload.description.as_deref(),
            )
            .await
    }

    pub async fn list_buyers(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
    ) -> Result<Vec<Buyer>, AppError> {
        self.require_membership(actor_id, company_id).await?;
        self.catalog_repo.list_buyers(company_id).await
    }

    pub async fn create_note(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        payload: &CreateNotePayload,
    ) -> Result<Note, AppError> {
        self.require_writer(actor_id, company_id).await?;
        self.catalog_repo
            .create_note(
                &self.pool,
                company_id,
                actor_id,
                &payload.title,
                payload.content.as_deref(),
            )
            .await
    }

    pub async fn list_notes(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
    ) -> Result<Vec<Note>, AppError> {
        self.require_membership(actor_id, company_id).await?;
        self.catalog_repo.list_notes(company_id).await
    }

    pub async fn create_project(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        payload: &CreateProjectPayload,
    ) -> Result<Project, AppError> {
        self.require_writer(actor_id, company_id).await?;
        self.catalog_repo
            .create_project(
                &self.pool,
                company_id,
                actor_id,
                &payload.name,
                payload.description.as_deref(),
            )
            .await
    }

    pub async fn list_projects(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
    ) -> Result<Vec<Project>, AppError> {
        self.require_membership(actor_id, company_id).await?;
        self.catalog_repo.list_projects(company_id).await
    }

    pub async fn create_image(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        payload: &CreateImagePayload,
    ) -> Result<Image, AppError> {
        self.require_writer(actor_id, company_id).await?;
        self.catalog_repo
            .create_image(
                &self.pool,
                company_id,
                actor_id,
                payload.label.as_deref(),
                &payload.url,
            )
            .await
    }

    pub async fn list_images(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
    ) -> Result<Vec<Image>, AppError> {
        self.require_membership(actor_id, company_id).await?;
        self.catalog_repo.list_images(company_id).await
    }

    // ---
    // Helpers
    // ---

    async fn require_membership(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> Result<Membership, AppError> {
        self.company_repo
            .membership_of(user_id, company_id)
            .await?
            .ok_or(AppError::NotACompanyMember)
    }

    async fn require_writer(&self, user_id: Uuid, company_id: Uuid) -> Result<Membership, AppError> {
        let actor = self.require_membership(user_id, company_id).await?;
        if !authz::can_write_directly(actor.role) {
            return Err(AppError::RoleNotAllowed);
        }
        Ok(actor)
    }
}
