// src/services/sample.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::authz,
    common::error::AppError,
    db::{CompanyRepository, RequestRepository, SampleRepository, StorageRepository},
    models::company::{EntityStatus, Membership},
    models::request::{RequestedAction, RequestedData, RequestedFrom},
    models::sample::{CreateSamplePayload, Sample, SampleDetail, UpdateSamplePayload},
    models::storage::StorageKind,
};

// Amostras: o cargo do ator decide entre escrita direta e moderada. A
// rotina de patch (apply_fields) é a mesma nos dois caminhos, então a
// normalização de peso/tamanho roda uma única vez, sempre na aplicação.
#[derive(Clone)]
pub struct SampleService {
    sample_repo: SampleRepository,
    storage_repo: StorageRepository,
    request_repo: RequestRepository,
    company_repo: CompanyRepository,
    pool: PgPool,
}

impl SampleService {
    pub fn new(
        sample_repo: SampleRepository,
        storage_repo: StorageRepository,
        request_repo: RequestRepository,
        company_repo: CompanyRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            sample_repo,
            storage_repo,
            request_repo,
            company_repo,
            pool,
        }
    }

    /// Criação. Cargos com escrita direta publicam na hora; STAFF cria o
    /// placeholder invisível (is_active = false) e abre o pedido CREATE na
    /// mesma transação. Os vínculos entram já na criação nos dois casos.
    pub async fn create(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        payload: &CreateSamplePayload,
    ) -> Result<SampleDetail, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        let direct = authz::can_write_directly(actor.role);

        let data = RequestedData::from_payload(payload)?;

        let storage = self
            .storage_repo
            .find_by_id_and_kind(
                &self.pool,
                company_id,
                payload.storage_uid,
                StorageKind::Space,
            )
            .await?
            .ok_or(AppError::StorageNotFoundForKind)?;

        let mut sample = Sample::seed(company_id, actor_id, storage.id);
        sample.is_active = direct;
        sample.apply_fields(&data.fields)?;

        let mut tx = self.pool.begin().await?;

        let sample = self.sample_repo.insert(&mut *tx, &sample).await?;

        for (kind, ids) in data.association_sets() {
            if let Some(ids) = ids {
                self.sample_repo
                    .insert_links(&mut *tx, sample.id, company_id, kind, ids)
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
                    Some(sample.id),
                    None,
                    RequestedFrom::Sample,
                    RequestedAction::Create,
                    &data,
                )
                .await?;
            tracing::info!(
                "Pedido CREATE aberto para a amostra {} por {}",
                sample.id,
                actor_id
            );
        }

        tx.commit().await?;

        self.with_links(sample).await
    }

    pub async fn list(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        storage_id: Uuid,
    ) -> Result<Vec<Sample>, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        self.require_space(company_id, storage_id).await?;
        self.sample_repo
            .list_in_storage(company_id, storage_id, authz::can_write_directly(actor.role))
            .await
    }

    pub async fn get(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        storage_id: Uuid,
        sample_id: Uuid,
    ) -> Result<SampleDetail, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        let sample = self
            .find_visible(
                company_id,
                storage_id,
                sample_id,
                authz::can_write_directly(actor.role),
            )
            .await?;
        self.with_links(sample).await
    }

    /// Atualização. No caminho direto o patch é aplicado e os vínculos
    /// fornecidos são substituídos agora. No caminho de STAFF a entidade
    /// não é tocada: o documento capturado sai com as cinco chaves
    /// reservadas completadas do estado atual e espera o veredito.
    pub async fn update(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        storage_id: Uuid,
        sample_id: Uuid,
        payload: &UpdateSamplePayload,
    ) -> Result<SampleDetail, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        let direct = authz::can_write_directly(actor.role);

        let mut sample = self
            .find_visible(company_id, storage_id, sample_id, direct)
            .await?;
        let data = RequestedData::from_payload(payload)?;

        if !direct {
            let linked = self.sample_repo.linked_ids(sample.id).await?;
            let captured = data.defaulted_for_update(sample.storage_id, &linked);

            self.request_repo
                .insert(
                    &self.pool,
                    company_id,
                    actor_id,
                    Some(sample.storage_id),
                    Some(sample.id),
                    None,
                    RequestedFrom::Sample,
                    RequestedAction::Update,
                    &captured,
                )
                .await?;
            tracing::info!(
                "Pedido UPDATE aberto para a amostra {} por {}",
                sample.id,
                actor_id
            );

            // A resposta devolve o estado vigente, intacto.
            return Ok(SampleDetail {
                sample,
                image_uids: linked.images,
                note_uids: linked.notes,
                buyer_uids: linked.buyers,
                project_uids: linked.projects,
            });
        }

        if let Some(uid) = data.storage_uid {
            let storage = self
                .storage_repo
                .find_by_id_and_kind(&self.pool, company_id, uid, StorageKind::Space)
                .await?
                .ok_or(AppError::StorageNotFoundForKind)?;
            sample.storage_id = storage.id;
        }
        sample.apply_fields(&data.fields)?;

        let mut tx = self.pool.begin().await?;

        let sample = self.sample_repo.save(&mut *tx, &sample).await?;
        for (kind, ids) in data.association_sets() {
            if let Some(ids) = ids {
                self.sample_repo
                    .clear_links(&mut *tx, sample.id, kind)
                    .await?;
                self.sample_repo
                    .insert_links(&mut *tx, sample.id, company_id, kind, ids)
                    .await?;
            }
        }

        tx.commit().await?;

        self.with_links(sample).await
    }

    /// Exclusão lógica, restrita a SUPER_ADMIN e ADMINISTRATOR.
    pub async fn remove(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        storage_id: Uuid,
        sample_id: Uuid,
    ) -> Result<(), AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        if !authz::can_remove_entities(actor.role) {
            return Err(AppError::RoleNotAllowed);
        }

        let sample = self
            .find_visible(company_id, storage_id, sample_id, true)
            .await?;
        self.sample_repo
            .set_status(&self.pool, company_id, sample.id, EntityStatus::Removed)
            .await?
            .ok_or(AppError::SampleNotFound)?;

        tracing::info!("Amostra {} removida da empresa {}", sample.id, company_id);
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

    // O storage do caminho precisa existir, ser SPACE e estar ACTIVE.
    async fn require_space(&self, company_id: Uuid, storage_id: Uuid) -> Result<(), AppError> {
        let storage = self
            .storage_repo
            .find_by_id_and_kind(&self.pool, company_id, storage_id, StorageKind::Space)
            .await?
            .ok_or(AppError::StorageNotFoundForKind)?;
        if storage.status != EntityStatus::Active {
            return Err(AppError::StorageNotFoundForKind);
        }
        Ok(())
    }

    // Detalhe segue a listagem: registro ACTIVE, no storage do caminho;
    // linha invisível (is_active = false) só aparece para quem tem escrita
    // direta, que é como um aprovador inspeciona um CREATE pendente.
    async fn find_visible(
        &self,
        company_id: Uuid,
        storage_id: Uuid,
        sample_id: Uuid,
        include_inactive: bool,
    ) -> Result<Sample, AppError> {
        let sample = self
            .sample_repo
            .find_by_id(&self.pool, company_id, sample_id)
            .await?
            .ok_or(AppError::SampleNotFound)?;
        if sample.storage_id != storage_id
            || sample.status != EntityStatus::Active
            || (!sample.is_active && !include_inactive)
        {
            return Err(AppError::SampleNotFound);
        }
        Ok(sample)
    }

    async fn with_links(&self, sample: Sample) -> Result<SampleDetail, AppError> {
        let linked = self.sample_repo.linked_ids(sample.id).await?;
        Ok(SampleDetail {
            sample,
            image_uids: linked.images,
            note_uids: linked.notes,
            buyer_uids: linked.buyers,
            project_uids: linked.projects,
        })
    }
}
