// src/services/membership.rs

use bcrypt::hash;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::authz,
    common::error::AppError,
    db::{CompanyRepository, UserRepository},
    models::company::{
        AddMemberPayload, AdminAttachMemberPayload, CompanyMembership, CompanyRole, MemberRow,
        Membership, UpdateMemberPayload,
    },
};

#[derive(Clone)]
pub struct MembershipService {
    user_repo: UserRepository,
    company_repo: CompanyRepository,
    pool: PgPool,
}

impl MembershipService {
    pub fn new(user_repo: UserRepository, company_repo: CompanyRepository, pool: PgPool) -> Self {
        Self {
            user_repo,
            company_repo,
            pool,
        }
    }

    pub async fn my_companies(&self, user_id: Uuid) -> Result<Vec<CompanyMembership>, AppError> {
        self.company_repo.companies_of_user(user_id).await
    }

    /// Troca a empresa ativa do usuário: desativa todos os vínculos ativos e
    /// ativa o alvo, na mesma transação. Trocar para a empresa já ativa é um
    /// no-op bem-sucedido.
    pub async fn switch_company(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> Result<Membership, AppError> {
        self.company_repo
            .find_company_by_id(company_id)
            .await?
            .ok_or(AppError::CompanyNotFound)?;

        self.company_repo
            .membership_of(user_id, company_id)
            .await?
            .ok_or(AppError::NotACompanyMember)?;

        let mut tx = self.pool.begin().await?;

        self.company_repo
            .deactivate_active_memberships(&mut *tx, user_id)
            .await?;
        let membership = self
            .company_repo
            .activate_membership(&mut *tx, user_id, company_id)
            .await?
            .ok_or(AppError::NotACompanyMember)?;

        tx.commit().await?;
        Ok(membership)
    }

    pub async fn list_members(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
    ) -> Result<Vec<MemberRow>, AppError> {
        self.require_membership(actor_id, company_id).await?;
        self.company_repo.list_members(company_id).await
    }

    /// Convida (ou vincula) um membro à empresa ativa do ator. O cargo
    /// concedido precisa estar estritamente abaixo do cargo do ator.
    pub async fn add_member(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        payload: &AddMemberPayload,
    ) -> Result<Membership, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        if !authz::can_manage_members(actor.role) {
            return Err(AppError::RoleNotAllowed);
        }
        if !actor.role.can_manage(payload.role) {
            return Err(AppError::CannotManageRole);
        }

        self.attach_member(
            company_id,
            actor_id,
            &payload.name,
            &payload.email,
            payload.phone.as_deref(),
            &payload.password,
            payload.role,
        )
        .await
    }

    /// Vínculo administrativo: o SUPER_ADMIN anexa um usuário a qualquer
    /// empresa, com qualquer cargo, sem checagem de hierarquia.
    pub async fn admin_attach(
        &self,
        actor_id: Uuid,
        payload: &AdminAttachMemberPayload,
    ) -> Result<Membership, AppError> {
        let actor = self
            .company_repo
            .active_membership(actor_id)
            .await?
            .ok_or(AppError::NoActiveMembership)?;
        if actor.role != CompanyRole::SuperAdmin {
            return Err(AppError::RoleNotAllowed);
        }

        self.company_repo
            .find_company_by_id(payload.company_id)
            .await?
            .ok_or(AppError::CompanyNotFound)?;

        self.attach_member(
            payload.company_id,
            actor_id,
            &payload.name,
            &payload.email,
            payload.phone.as_deref(),
            &payload.password,
            payload.role,
        )
        .await
    }

    pub async fn update_member_role(
        &self,
        actor_id: Uuid,
        company_id: Uuid,
        member_user_id: Uuid,
        payload: &UpdateMemberPayload,
    ) -> Result<Membership, AppError> {
        let actor = self.require_membership(actor_id, company_id).await?;
        if !authz::can_manage_members(actor.role) {
            return Err(AppError::RoleNotAllowed);
        }

        let target = self
            .company_repo
            .membership_of(member_user_id, company_id)
            .await?
            .ok_or(AppError::MembershipNotFound)?;

        // O ator precisa superar tanto o cargo atual do membro quanto o novo.
        if !actor.role.can_manage(target.role) || !actor.role.can_manage(payload.role) {
            return Err(AppError::CannotManageRole);
        }

        self.company_repo
            .update_member_role(&self.pool, company_id, member_user_id, payload.role)
            .await?
            .ok_or(AppError::MembershipNotFound)
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

    async fn attach_member(
        &self,
        company_id: Uuid,
        created_by: Uuid,
        name: &str,
        email: &str,
        phone: Option<&str>,
        password: &str,
        role: CompanyRole,
    ) -> Result<Membership, AppError> {
        let mut tx = self.pool.begin().await?;

        // E-mail já cadastrado vincula o usuário existente; a senha dele
        // não muda.
        let user = match self.user_repo.find_by_email(email).await? {
            Some(existing) => existing,
            None => {
                let password = password.to_owned();
                let hashed =
                    tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                        .await
                        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
                self.user_repo
                    .create_user(&mut *tx, name, email, phone, &hashed)
                    .await?
            }
        };

        // Só o primeiro vínculo do usuário entra como empresa selecionada;
        // os demais esperam um switch explícito.
        let is_first = self
            .company_repo
            .active_membership(user.id)
            .await?
            .is_none();

        let membership = self
            .company_repo
            .create_membership(&mut *tx, company_id, user.id, Some(created_by), role, is_first)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Membro {} vinculado à empresa {} como {}",
            user.id,
            company_id,
            role
        );

        Ok(membership)
    }
}
