// src/services/file.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::authz,
    common::error::AppError,
    db::{CompanyRepository, FileRepository, RequestRepository, StorageRepository},
    models::company::{EntityStatus, Membership},
    models::file::{CreateFilePayload, File, FileDetail, UpdateFilePayload},
    models::request::{RequestedAction, RequestedData, RequestedFrom},
    models::storage::StorageKind,
};

// Arquivos de cabide: o fluxo é o espelho do de amostras (escrita direta
// ou moderada), trocando SPACE por DRAWER e sem normalização de campos.
#[derive(Clone)]
pub struct FileService {
    file_repo: FileRepository,
    storage_repo: StorageRepository,
    request_repo: RequestRepository,
    company_repo: CompanyRepository,
    pool: PgPool,
}

impl FileService {
    pub fn new(
        file_repo: FileRepository,
        storage_repo: StorageRepository,
        request_repo: RequestRepository,
        company_repo: CompanyRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            file_repo,
            storage_repo,
            request_repo,
            company_repo,
            pool,
        }
    }

    pub async fn create(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        payload: &CreateFilePayload,
    ) -> Result<FileDetail, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        let direct = authz::can_write_directly(actor.role);

        let data = RequestedData::from_payload(payload)?;

        let storage = self
            .storage_repo
            .find_by_id_and_kind(
                &self.pool,
                company_id,
                payload.storage_uid,
                StorageKind::Drawer,
            )
            .await?
            .ok_or(AppError::StorageNotFoundForKind)?;

        let mut file = File::seed(company_id, actor_id, storage.id);
        file.is_active = direct;
        file.apply_fields(&data.fields)?;

        let mut tx = self.pool.begin().await?;

        let file = self.file_repo.insert(&mut *tx, &file).await?;

        for (kind, ids) in data.association_sets() {
            if let Some(ids) = ids {
                self.file_repo
                    .insert_links(&mut *tx, file.id, company_id, kind, ids)
                    .await?;
            }
        }

        if !direct {
            self.request_repo
                .insert(
                    &mut *tx,
                    company_id,
                    actor_id,
                    Some(storage.id),
                    None,
                    Some(file.id),
                    RequestedFrom::File,
                    RequestedAction::Create,
                    &data,
                )
                .await?;
            tracing::info!(
                "Pedido CREATE aberto para o arquivo {} por {}",
                file.id,
                actor_id
            );
        }

        tx.commit().await?;

        self.with_links(file).await
    }

    pub async fn list(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        storage_id: Uuid,
    ) -> Result<Vec<File>, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        self.require_drawer(company_id, storage_id).await?;
        self.file_repo
            .list_in_storage(company_id, storage_id, authz::can_write_directly(actor.role))
            .await
    }

    pub async fn get(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        storage_id: Uuid,
        file_id: Uuid,
    ) -> Result<FileDetail, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        let file = self
            .find_visible(
                company_id,
                storage_id,
                file_id,
                authz::can_write_directly(actor.role),
            )
            .await?;
        self.with_links(file).await
    }

    pub async fn update(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        storage_id: Uuid,
        file_id: Uuid,
        payload: &UpdateFilePayload,
    ) -> Result<FileDetail, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        let direct = authz::can_write_directly(actor.role);

        let mut file = self
            .find_visible(company_id, storage_id, file_id, direct)
            .await?;
        let data = RequestedData::from_payload(payload)?;

        if !direct {
            let linked = self.file_repo.linked_ids(file.id).await?;
            let captured = data.defaulted_for_update(file.storage_id, &linked);

            self.request_repo
                .insert(
                    &self.pool,
                    company_id,
                    actor_id,
                    Some(file.storage_id),
                    None,
                    Some(file.id),
                    RequestedFrom::File,
                    RequestedAction::Update,
                    &captured,
                )
                .await?;
            tracing::info!(
                "Pedido UPDATE aberto para o arquivo {} por {}",
                file.id,
                actor_id
            );

            return Ok(FileDetail {
                file,
                image_uids: linked.images,
                note_uids: linked.notes,
                buyer_uids: linked.buyers,
                project_uids: linked.projects,
            });
        }

        if let Some(uid) = data.storage_uid {
            let storage = self
                .storage_repo
                .find_by_id_and_kind(&self.pool, company_id, uid, StorageKind::Drawer)
                .await?
                .ok_or(AppError::StorageNotFoundForKind)?;
            file.storage_id = storage.id;
        }
        file.apply_fields(&data.fields)?;

        let mut tx = self.pool.begin().await?;

        let file = self.file_repo.save(&mut *tx, &file).await?;
        for (kind, ids) in data.association_sets() {
            if let Some(ids) = ids {
                self.file_repo.clear_links(&mut *tx, file.id, kind).await?;
                self.file_repo
                    .insert_links(&mut *tx, file.id, company_id, kind, ids)
                    .await?;
            }
        }

        tx.commit().await?;

        self.with_links(file).await
    }

    pub async fn remove(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        storage_id: Uuid,
        file_id: Uuid,
    ) -> Result<(), AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        if !authz::can_remove_entities(actor.role) {
            return Err(AppError::RoleNotAllowed);
        }

        let file = self
            .find_visible(company_id, storage_id, file_id, true)
            .await?;
        self.file_repo
            .set_status(&self.pool, company_id, file.id, EntityStatus::Removed)
            .await?
            .ok_or(AppError::FileNotFound)?;

        tracing::info!("Arquivo {} removido da empresa {}", file.id, company_id);
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

    async fn require_drawer(&self, company_id: Uuid, storage_id: Uuid) -> Result<(), AppError> {
        let storage = self
            .storage_repo
            .find_by_id_and_kind(&self.pool, company_id, storage_id, StorageKind::Drawer)
            .await?
            .ok_or(AppError::StorageNotFoundForKind)?;
        if storage.status != EntityStatus::Active {
            return Err(AppError::StorageNotFoundForKind);
        }
        Ok(())
    }

    async fn find_visible(
        &self,
        company_id: Uuid,
        storage_id: Uuid,
        file_id: Uuid,
        include_inactive: bool,
    ) -> Result<File, AppError> {
        let file = self
            .file_repo
            .find_by_id(&self.pool, company_id, file_id)
            .await?
            .ok_or(AppError::FileNotFound)?;
        if file.storage_id != storage_id
            || file.status != EntityStatus::Active
            || (!file.is_active && !include_inactive)
        {
            return Err(AppError::FileNotFound);
        }
        Ok(file)
    }

    async fn with_links(&self, file: File) -> Result<FileDetail, AppError> {
        let linked = self.file_repo.linked_ids(file.id).await?;
        Ok(FileDetail {
            file,
            image_uids: linked.images,
            note_uids: linked.notes,
            buyer_uids: linked.buyers,
            project_uids: linked.projects,
        })
    }
}
