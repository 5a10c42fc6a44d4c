// src/middleware/rbac.rs

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use std::marker::PhantomData;

use crate::{
    common::{authz, error::ApiError},
    models::company::{CompanyRole, Membership},
};

/// O trait que liga um marcador de rota a uma tabela de elegibilidade.
pub trait RoleGate: Send + Sync + 'static {
    fn allows(role: CompanyRole) -> bool;
    fn label() -> &'static str;
}

/// Extrator-guardião: exige que o cargo do membership ativo passe na tabela
/// do gate. Roda depois do membership_guard, que pendura o Membership nos
/// extensions; o serviço por trás ainda revalida com o próprio contexto.
pub struct RequireRole<G>(pub PhantomData<G>);

impl<G, S> FromRequestParts<S> for RequireRole<G>
where
    G: RoleGate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let membership = parts.extensions.get::<Membership>().ok_or(ApiError {
            status: StatusCode::FORBIDDEN,
            error: "Nenhuma empresa ativa".into(),
            details: None,
        })?;

        if !G::allows(membership.role) {
            return Err(ApiError {
                status: StatusCode::FORBIDDEN,
                error: format!("O cargo {} não pode {}.", membership.role, G::label()),
                details: None,
            });
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// Gates (um por tabela de elegibilidade)
// ---

pub struct DirectWrite;
impl RoleGate for DirectWrite {
    fn allows(role: CompanyRole) -> bool {
        authz::can_write_directly(role)
    }
    fn label() -> &'static str {
        "escrever sem moderação"
    }
}

pub struct ResolveRequests;
impl RoleGate for ResolveRequests {
    fn allows(role: CompanyRole) -> bool {
        authz::can_resolve_requests(role)
    }
    fn label() -> &'static str {
        "resolver pedidos de modificação"
    }
}

pub struct RemoveEntities;
impl RoleGate for RemoveEntities {
    fn allows(role: CompanyRole) -> bool {
        authz::can_remove_entities(role)
    }
    fn label() -> &'static str {
        "remover registros"
    }
}

pub struct ManageStorages;
impl RoleGate for ManageStorages {
    fn allows(role: CompanyRole) -> bool {
        authz::can_manage_storages(role)
    }
    fn label() -> &'static str {
        "gerenciar storages"
    }
}

pub struct ManageMembers;
impl RoleGate for ManageMembers {
    fn allows(role: CompanyRole) -> bool {
        authz::can_manage_members(role)
    }
    fn label() -> &'static str {
        "gerenciar membros"
    }
}

pub struct SuperAdminOnly;
impl RoleGate for SuperAdminOnly {
    fn allows(role: CompanyRole) -> bool {
        role == CompanyRole::SuperAdmin
    }
    fn label() -> &'static str {
        "usar o console administrativo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gates_follow_the_eligibility_tables() {
        for role in CompanyRole::ALL {
            assert_eq!(DirectWrite::allows(role), role != CompanyRole::Staff);
            assert_eq!(ResolveRequests::allows(role), role != CompanyRole::Staff);
            assert_eq!(
                RemoveEntities::allows(role),
                matches!(role, CompanyRole::SuperAdmin | CompanyRole::Administrator)
            );
            assert_eq!(
                SuperAdminOnly::allows(role),
                role == CompanyRole::SuperAdmin
            );
        }
    }

    #[test]
    fn member_gate_excludes_the_extremes() {
        assert!(!ManageMembers::allows(CompanyRole::SuperAdmin));
        assert!(!ManageMembers::allows(CompanyRole::Staff));
        assert!(ManageMembers::allows(CompanyRole::Manager));
    }
}
