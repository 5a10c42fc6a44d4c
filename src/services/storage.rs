// src/services/storage.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::authz,
    common::error::AppError,
    db::{CompanyRepository, StorageRepository},
    models::company::{CompanyRole, EntityStatus, Membership},
    models::storage::{CreateStoragePayload, ListStoragesQuery, Storage, UpdateStoragePayload},
};

// Locais físicos (SPACE/DRAWER). STAFF nunca escreve aqui, nem por
// moderação: storage é infraestrutura, não item de inventário.
#[derive(Clone)]
pub struct StorageService {
    storage_repo: StorageRepository,
    company_repo: CompanyRepository,
    pool: PgPool,
}

impl StorageService {
    pub fn new(
        storage_repo: StorageRepository,
        company_repo: CompanyRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            storage_repo,
            company_repo,
            pool,
        }
    }

    pub async fn create(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        payload: &CreateStoragePayload,
    ) -> Result<Storage, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        if !authz::can_manage_storages(actor.role) {
            return Err(AppError::RoleNotAllowed);
        }

        let parent_id = match payload.parent_uid {
            Some(uid) => Some(self.resolve_parent(company_id, uid).await?),
            None => None,
        };

        self.storage_repo
            .create(
                &self.pool,
                company_id,
                actor_id,
                &payload.name,
                payload.description.as_deref(),
                payload.kind,
                parent_id,
            )
            .await
    }

    /// SUPER_ADMIN enxerga todos os status; os demais só o que está ACTIVE.
    pub async fn list(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        query: &ListStoragesQuery,
    ) -> Result<Vec<Storage>, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        let only_active = actor.role != CompanyRole::SuperAdmin;
        self.storage_repo
            .list(company_id, query.kind, query.parent_uid, only_active)
            .await
    }

    pub async fn get(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<Storage, AppError> {
        self.require_membership(actor_id, company_id).await?;
        self.find_active(company_id, id).await
    }

    pub async fn update(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        id: Uuid,
        payload: &UpdateStoragePayload,
    ) -> Result<Storage, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        if !authz::can_manage_storages(actor.role) {
            return Err(AppError::RoleNotAllowed);
        }

        let mut storage = self.find_active(company_id, id).await?;

        if let Some(uid) = payload.parent_uid {
            storage.parent_id = Some(self.resolve_parent(company_id, uid).await?);
        }
        if let Some(name) = &payload.name {
            storage.name = name.clone();
        }
        if payload.description.is_some() {
            storage.description = payload.description.clone();
        }
        if let Some(kind) = payload.kind {
            storage.kind = kind;
        }

        self.storage_repo.save(&self.pool, &storage).await
    }

    /// Exclusão lógica: o registro vira REMOVED e some das listagens.
    pub async fn remove(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        id: Uuid,
    ) -> Result<(), AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        if !authz::can_remove_entities(actor.role) {
            return Err(AppError::RoleNotAllowed);
        }

        self.find_active(company_id, id).await?;
        self.storage_repo
            .set_status(&self.pool, company_id, id, EntityStatus::Removed)
            .await?
            .ok_or(AppError::StorageNotFound)?;

        tracing::info!("Storage {} removido da empresa {}", id, company_id);
        Ok(())
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

    // A visão de detalhe só alcança registros ACTIVE, para qualquer cargo.
    async fn find_active(&self, company_id: Uuid, id: Uuid) -> Result<Storage, AppError> {
        let storage = self
            .storage_repo
            .find_by_id(company_id, id)
            .await?
            .ok_or(AppError::StorageNotFound)?;
        if storage.status != EntityStatus::Active {
            return Err(AppError::StorageNotFound);
        }
        Ok(storage)
    }

    async fn resolve_parent(&self, company_id: Uuid, uid: Uuid) -> Result<Uuid, AppError> {
        let parent = self
            .storage_repo
            .find_by_id(company_id, uid)
            .await?
            .ok_or(AppError::StorageNotFoundForKind)?;
        Ok(parent.id)
    }
}
