// src/services/request.rs

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::authz::{self, RequestScope},
    common::error::AppError,
    db::{CompanyRepository, FileRepository, RequestRepository, SampleRepository, StorageRepository},
    models::company::Membership,
    models::request::{
        ModifyRequest, RequestStatus, RequestVerdict, RequestedAction, RequestedFrom,
        ResolveRequestPayload,
    },
    models::storage::StorageKind,
};

// Pedidos de modificação: listagem com escopo por cargo e resolução com
// replay. O replay reaplica o documento capturado sobre o estado ATUAL da
// entidade, na mesma transação do veredito.
#[derive(Clone)]
pub struct RequestService {
    request_repo: RequestRepository,
    sample_repo: SampleRepository,
    file_repo: FileRepository,
    storage_repo: StorageRepository,
    company_repo: CompanyRepository,
    pool: PgPool,
}

impl RequestService {
    pub fn new(
        request_repo: RequestRepository,
        sample_repo: SampleRepository,
        file_repo: FileRepository,
        storage_repo: StorageRepository,
        company_repo: CompanyRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            request_repo,
            sample_repo,
            file_repo,
            storage_repo,
            company_repo,
            pool,
        }
    }

    /// STAFF vê só o que abriu; os demais veem todos os pedidos da empresa.
    pub async fn list(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
    ) -> Result<Vec<ModifyRequest>, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        match authz::request_scope(actor.role) {
            RequestScope::Company => self.request_repo.list_company(company_id).await,
            RequestScope::Own => self.request_repo.list_own(company_id, actor_id).await,
        }
    }

    pub async fn get(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        request_id: Uuid,
    ) -> Result<ModifyRequest, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        let request = self
            .request_repo
            .find_by_id(&self.pool, company_id, request_id)
            .await?
            .ok_or(AppError::RequestNotFound)?;

        // Fora do escopo a resposta é 404, nunca 403: o pedido de outro
        // membro simplesmente não existe para STAFF.
        if authz::request_scope(actor.role) == RequestScope::Own
            && request.requested_by != actor_id
        {
            return Err(AppError::RequestNotFound);
        }
        Ok(request)
    }

    /// Aplica o veredito. Rejeição só muda o pedido (um CREATE rejeitado
    /// deixa o placeholder invisível para trás). Aprovação de CREATE liga a
    /// visibilidade da entidade; aprovação de UPDATE reaplica o patch sobre
    /// o estado atual. Tudo na mesma transação: se o replay falhar, o
    /// veredito também é desfeito.
    pub async fn resolve(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        request_id: Uuid,
        payload: &ResolveRequestPayload,
    ) -> Result<ModifyRequest, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        if !authz::can_resolve_requests(actor.role) {
            return Err(AppError::RoleNotAllowed);
        }

        let mut tx = self.pool.begin().await?;

        let request = self
            .request_repo
            .find_by_id(&mut *tx, company_id, request_id)
            .await?
            .ok_or(AppError::RequestNotFound)?;
        request.ensure_pending()?;

        let status = match payload.status {
            RequestVerdict::Accepted => RequestStatus::Accepted,
            RequestVerdict::Rejected => RequestStatus::Rejected,
        };

        // O UPDATE filtra por PENDING e tranca a linha: um segundo veredito
        // concorrente esbarra aqui e desfaz o próprio replay.
        let resolved = self
            .request_repo
            .mark_resolved(&mut *tx, request.id, status, actor_id)
            .await?
            .ok_or(AppError::RequestAlreadyResolved)?;

        if status == RequestStatus::Accepted {
            self.replay(&mut tx, &request).await?;
        }

        tx.commit().await?;

        tracing::info!(
            "Pedido {} resolvido como {:?} por {}",
            request.id,
            resolved.status,
            actor_id
        );
        Ok(resolved)
    }

    // ---
    // Replay
    // ---

    async fn replay(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: &ModifyRequest,
    ) -> Result<(), AppError> {
        match (request.requested_from, request.requested_action) {
            // CREATE aprovado: a linha já existe com os dados aplicados na
            // captura; só a visibilidade muda.
            (RequestedFrom::Sample, RequestedAction::Create) => {
                let sample_id = request.sample_id.ok_or(AppError::SampleNotFound)?;
                self.sample_repo
                    .set_active(&mut **tx, request.company_id, sample_id, true)
                    .await?
                    .ok_or(AppError::SampleNotFound)?;
            }
            (RequestedFrom::File, RequestedAction::Create) => {
                let file_id = request.file_id.ok_or(AppError::FileNotFound)?;
                self.file_repo
                    .set_active(&mut **tx, request.company_id, file_id, true)
                    .await?
                    .ok_or(AppError::FileNotFound)?;
            }
            (RequestedFrom::Sample, RequestedAction::Update) => {
                let sample_id = request.sample_id.ok_or(AppError::SampleNotFound)?;
                let mut sample = self
                    .sample_repo
                    .find_by_id(&mut **tx, request.company_id, sample_id)
                    .await?
                    .ok_or(AppError::SampleNotFound)?;

                let data = &request.requested_data.0;

                // Se o storage capturado não resolve mais (removido ou de
                // outro tipo), a mudança de local é pulada em silêncio e o
                // resto do patch segue valendo.
                if let Some(uid) = data.storage_uid {
                    match self
                        .storage_repo
                        .find_by_id_and_kind(
                            &mut **tx,
                            request.company_id,
                            uid,
                            StorageKind::Space,
                        )
                        .await?
                    {
                        Some(storage) => sample.storage_id = storage.id,
                        None => tracing::warn!(
                            "Replay do pedido {}: storage {} não resolve; local mantido",
                            request.id,
                            uid
                        ),
                    }
                }

                sample.apply_fields(&data.fields)?;
                self.sample_repo.save(&mut **tx, &sample).await?;

                for (kind, ids) in data.association_sets() {
                    if let Some(ids) = ids {
                        self.sample_repo
                            .clear_links(&mut **tx, sample.id, kind)
                            .await?;
                        self.sample_repo
                            .insert_links(&mut **tx, sample.id, request.company_id, kind, ids)
                            .await?;
                    }
                }
            }
            (RequestedFrom::File, RequestedAction::Update) => {
                let file_id = request.file_id.ok_or(AppError::FileNotFound)?;
                let mut file = self
                    .file_repo
                    .find_by_id(&mut **tx, request.company_id, file_id)
                    .await?
                    .ok_or(AppError::FileNotFound)?;

                let data = &request.requested_data.0;

                if let Some(uid) = data.storage_uid {
                    match self
                        .storage_repo
                        .find_by_id_and_kind(
                            &mut **tx,
                            request.company_id,
                            uid,
                            StorageKind::Drawer,
                        )
                        .await?
                    {
                        Some(storage) => file.storage_id = storage.id,
                        None => tracing::warn!(
                            "Replay do pedido {}: storage {} não resolve; local mantido",
                            request.id,
                            uid
                        ),
                    }
                }

                file.apply_fields(&data.fields)?;
                self.file_repo.save(&mut **tx, &file).await?;

                for (kind, ids) in data.association_sets() {
                    if let Some(ids) = ids {
                        self.file_repo.clear_links(&mut **tx, file.id, kind).await?;
                        self.file_repo
                            .insert_links(&mut **tx, file.id, request.company_id, kind, ids)
                            .await?;
                    }
                }
            }
        }
        Ok(())
    }

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
}
