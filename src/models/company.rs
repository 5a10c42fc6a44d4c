// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// ---
// 1. CompanyRole (a hierarquia de cargos)
// ---
// Seis níveis, do chão de loja ao dono da conta. A comparação é sempre
// estrita: cargos iguais nunca gerenciam um ao outro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "company_role", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum CompanyRole {
    SuperAdmin,
    Administrator,
    Manager,
    Accountant,
    Merchandiser,
    Staff,
}

impl CompanyRole {
    pub const ALL: [CompanyRole; 6] = [
        CompanyRole::SuperAdmin,
        CompanyRole::Administrator,
        CompanyRole::Manager,
        CompanyRole::Accountant,
        CompanyRole::Merchandiser,
        CompanyRole::Staff,
    ];

    /// Posição numérica do cargo na hierarquia (6 = SUPER_ADMIN ... 1 = STAFF).
    pub fn rank(self) -> u8 {
        match self {
            CompanyRole::SuperAdmin => 6,
            CompanyRole::Administrator => 5,
            CompanyRole::Manager => 4,
            CompanyRole::Accountant => 3,
            CompanyRole::Merchandiser => 2,
            CompanyRole::Staff => 1,
        }
    }

    /// Um ator só gerencia cargos estritamente abaixo do seu.
    pub fn can_manage(self, target: CompanyRole) -> bool {
        self.rank() > target.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompanyRole::SuperAdmin => "SUPER_ADMIN",
            CompanyRole::Administrator => "ADMINISTRATOR",
            CompanyRole::Manager => "MANAGER",
            CompanyRole::Accountant => "ACCOUNTANT",
            CompanyRole::Merchandiser => "MERCHANDISER",
            CompanyRole::Staff => "STAFF",
        }
    }
}

impl fmt::Display for CompanyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanyRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(CompanyRole::SuperAdmin),
            "ADMINISTRATOR" => Ok(CompanyRole::Administrator),
            "MANAGER" => Ok(CompanyRole::Manager),
            "ACCOUNTANT" => Ok(CompanyRole::Accountant),
            "MERCHANDISER" => Ok(CompanyRole::Merchandiser),
            "STAFF" => Ok(CompanyRole::Staff),
            other => Err(format!("cargo desconhecido: {other}")),
        }
    }
}

// ---
// 2. EntityStatus (ciclo de vida comum)
// ---
// Compartilhado por memberships, storages, amostras, arquivos e catálogo.
// REMOVED é a exclusão lógica; nada é apagado fisicamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "entity_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityStatus {
    Draft,
    Placeholder,
    Active,
    Hidden,
    Paused,
    Removed,
}

// ---
// 3. Company
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 4. Membership (a ponte Usuário-Company)
// ---
// Um registro por par (company, user); `is_active` marca a empresa
// atualmente selecionada pelo usuário (no máximo uma por vez).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub created_by: Option<Uuid>,
    pub role: CompanyRole,
    pub is_active: bool,
    pub status: EntityStatus,
    pub joined_at: DateTime<Utc>,
    pub last_active: Option<DateTime<Utc>>,
}

// Linha do join membership + company, usada em /users/me/companies.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyMembership {
    pub company_id: Uuid,
    pub company_name: String,
    pub role: CompanyRole,
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
}

// Linha do join membership + user, usada na listagem de membros.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MemberRow {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: CompanyRole,
    pub is_active: bool,
    pub status: EntityStatus,
    pub joined_at: DateTime<Utc>,
}

// ---
// 5. Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SwitchCompanyPayload {
    pub company_id: Uuid,
}

// Adiciona um membro à empresa ativa; se o e-mail já existir, o usuário
// existente é vinculado sem alterar a senha dele.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberPayload {
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    pub role: CompanyRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberPayload {
    pub role: CompanyRole,
}

// Vínculo direto feito pelo SUPER_ADMIN, sem checagem de hierarquia.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminAttachMemberPayload {
    pub company_id: Uuid,
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    pub role: CompanyRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_is_a_total_order_without_ties() {
        for pair in CompanyRole::ALL.windows(2) {
            assert!(
                pair[0].rank() > pair[1].rank(),
                "{} deveria ter rank maior que {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn can_manage_requires_strictly_higher_rank() {
        for actor in CompanyRole::ALL {
            // Nenhum cargo gerencia a si mesmo.
            assert!(!actor.can_manage(actor));
            for target in CompanyRole::ALL {
                assert_eq!(actor.can_manage(target), actor.rank() > target.rank());
                // Assimetria: se A gerencia B, B não gerencia A.
                if actor.can_manage(target) {
                    assert!(!target.can_manage(actor));
                }
            }
        }
    }

    #[test]
    fn super_admin_manages_everyone_staff_manages_no_one() {
        for role in CompanyRole::ALL {
            if role != CompanyRole::SuperAdmin {
                assert!(CompanyRole::SuperAdmin.can_manage(role));
            }
            assert!(!CompanyRole::Staff.can_manage(role));
        }
    }

    #[test]
    fn parse_accepts_exact_names_and_rejects_the_rest() {
        assert_eq!(
            "MERCHANDISER".parse::<CompanyRole>().ok(),
            Some(CompanyRole::Merchandiser)
        );
        assert_eq!(CompanyRole::SuperAdmin.to_string(), "SUPER_ADMIN");
        assert!("merchandiser".parse::<CompanyRole>().is_err());
        assert!("OWNER".parse::<CompanyRole>().is_err());
        assert!("".parse::<CompanyRole>().is_err());
    }
}
