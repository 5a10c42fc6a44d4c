// src/db/company_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::company::{
    Company, CompanyMembership, CompanyRole, MemberRow, Membership,
};

// Empresas e a tabela-ponte de memberships. O par (company, user) é único;
// a "empresa ativa" de um usuário é o membership dele com is_active = true.
#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_company<'e, E>(
        &self,
        executor: E,
        name: &str,
        created_by: Option<Uuid>,
    ) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, created_by)
            VALUES ($1, $2)
            RETURNING id, name, created_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(company)
    }

    pub async fn find_company_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let maybe_company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, created_by, created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_company)
    }

    pub async fn create_membership<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        user_id: Uuid,
        created_by: Option<Uuid>,
        role: CompanyRole,
        is_active: bool,
    ) -> Result<Membership, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO memberships (company_id, user_id, created_by, role, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, company_id, user_id, created_by, role, is_active,
                      status, joined_at, last_active
            "#,
        )
        .bind(company_id)
        .bind(user_id)
        .bind(created_by)
        .bind(role)
        .bind(is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::MembershipAlreadyExists;
                }
            }
            e.into()
        })
    }

    /// O vínculo de um usuário com uma empresa específica.
    pub async fn membership_of(
        &self,
        user_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Membership>, AppError> {
        let maybe = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, company_id, user_id, created_by, role, is_active,
                   status, joined_at, last_active
            FROM memberships
            WHERE user_id = $1 AND company_id = $2
            "#,
        )
        .bind(user_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    /// O membership ativo do usuário (a empresa selecionada no momento).
    pub async fn active_membership(&self, user_id: Uuid) -> Result<Option<Membership>, AppError> {
        let maybe = sqlx::query_as::<_, Membership>(
            r#"
            SELECT id, company_id, user_id, created_by, role, is_active,
                   status, joined_at, last_active
            FROM memberships
            WHERE user_id = $1 AND is_active = true
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe)
    }

    pub async fn companies_of_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CompanyMembership>, AppError> {
        let rows = sqlx::query_as::<_, CompanyMembership>(
            r#"
            SELECT c.id AS company_id, c.name AS company_name,
                   m.role, m.is_active, m.joined_at
            FROM memberships m
            JOIN companies c ON c.id = m.company_id
            WHERE m.user_id = $1
            ORDER BY m.joined_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_members(&self, company_id: Uuid) -> Result<Vec<MemberRow>, AppError> {
        let rows = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT u.id AS user_id, u.name, u.email,
                   m.role, m.is_active, m.status, m.joined_at
            FROM memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.company_id = $1
            ORDER BY m.joined_at ASC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn update_member_role<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        user_id: Uuid,
        role: CompanyRole,
    ) -> Result<Option<Membership>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE memberships
            SET role = $3
            WHERE company_id = $1 AND user_id = $2
            RETURNING id, company_id, user_id, created_by, role, is_active,
                      status, joined_at, last_active
            "#,
        )
        .bind(company_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }

    // ---
    // Troca atômica de empresa ativa: as duas pernas rodam na mesma
    // transação aberta pelo serviço.
    // ---

    pub async fn deactivate_active_memberships<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE memberships
            SET is_active = false
            WHERE user_id = $1 AND is_active = true
            "#,
        )
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn activate_membership<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        company_id: Uuid,
    ) -> Result<Option<Membership>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe = sqlx::query_as::<_, Membership>(
            r#"
            UPDATE memberships
            SET is_active = true, last_active = now()
            WHERE user_id = $1 AND company_id = $2
            RETURNING id, company_id, user_id, created_by, role, is_active,
                      status, joined_at, last_active
            "#,
        )
        .bind(user_id)
        .bind(company_id)
        .fetch_optional(executor)
        .await?;
        Ok(maybe)
    }
}
