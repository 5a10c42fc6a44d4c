// src/common/authz.rs

use crate::models::company::CompanyRole;

// Tabelas estáticas de elegibilidade: cada classe de operação tem sua
// lista de cargos. A checagem é sempre por pertencimento, nunca por rank;
// o rank só entra na gestão de membros (can_manage).

/// Cargos que escrevem entidades direto, sem moderação. STAFF fica de fora:
/// toda escrita dele vira um ModifyRequest pendente.
pub const DIRECT_WRITE_ROLES: [CompanyRole; 5] = [
    CompanyRole::SuperAdmin,
    CompanyRole::Administrator,
    CompanyRole::Manager,
    CompanyRole::Accountant,
    CompanyRole::Merchandiser,
];

/// Cargos que aprovam ou rejeitam pedidos de modificação.
pub const REQUEST_RESOLVER_ROLES: [CompanyRole; 5] = [
    CompanyRole::SuperAdmin,
    CompanyRole::Administrator,
    CompanyRole::Manager,
    CompanyRole::Accountant,
    CompanyRole::Merchandiser,
];

/// Cargos que removem entidades (exclusão lógica, status REMOVED).
pub const REMOVAL_ROLES: [CompanyRole; 2] = [CompanyRole::SuperAdmin, CompanyRole::Administrator];

/// Cargos que criam e alteram storages. Escrita de storage nunca é
/// moderada: para STAFF ela é recusada, não enfileirada.
pub const STORAGE_MANAGER_ROLES: [CompanyRole; 5] = [
    CompanyRole::SuperAdmin,
    CompanyRole::Administrator,
    CompanyRole::Manager,
    CompanyRole::Accountant,
    CompanyRole::Merchandiser,
];

/// Cargos que gerenciam membros pelos endpoints da empresa. SUPER_ADMIN
/// usa o endpoint administrativo próprio.
pub const MEMBER_MANAGER_ROLES: [CompanyRole; 4] = [
    CompanyRole::Administrator,
    CompanyRole::Manager,
    CompanyRole::Accountant,
    CompanyRole::Merchandiser,
];

pub fn can_write_directly(role: CompanyRole) -> bool {
    DIRECT_WRITE_ROLES.contains(&role)
}

pub fn can_resolve_requests(role: CompanyRole) -> bool {
    REQUEST_RESOLVER_ROLES.contains(&role)
}

pub fn can_remove_entities(role: CompanyRole) -> bool {
    REMOVAL_ROLES.contains(&role)
}

pub fn can_manage_storages(role: CompanyRole) -> bool {
    STORAGE_MANAGER_ROLES.contains(&role)
}

pub fn can_manage_members(role: CompanyRole) -> bool {
    MEMBER_MANAGER_ROLES.contains(&role)
}

// ---
// Escopo de visibilidade dos pedidos de modificação
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestScope {
    /// Só os pedidos que o próprio ator abriu.
    Own,
    /// Todos os pedidos da empresa ativa.
    Company,
}

pub fn request_scope(role: CompanyRole) -> RequestScope {
    match role {
        CompanyRole::Staff => RequestScope::Own,
        _ => RequestScope::Company,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_is_the_only_role_without_direct_write() {
        for role in CompanyRole::ALL {
            assert_eq!(can_write_directly(role), role != CompanyRole::Staff);
        }
    }

    #[test]
    fn staff_never_resolves_requests() {
        for role in CompanyRole::ALL {
            assert_eq!(can_resolve_requests(role), role != CompanyRole::Staff);
        }
    }

    #[test]
    fn removal_is_limited_to_the_top_two_roles() {
        assert!(can_remove_entities(CompanyRole::SuperAdmin));
        assert!(can_remove_entities(CompanyRole::Administrator));
        assert!(!can_remove_entities(CompanyRole::Manager));
        assert!(!can_remove_entities(CompanyRole::Accountant));
        assert!(!can_remove_entities(CompanyRole::Merchandiser));
        assert!(!can_remove_entities(CompanyRole::Staff));
    }

    #[test]
    fn member_management_excludes_super_admin_and_staff() {
        assert!(!can_manage_members(CompanyRole::SuperAdmin));
        assert!(!can_manage_members(CompanyRole::Staff));
        for role in [
            CompanyRole::Administrator,
            CompanyRole::Manager,
            CompanyRole::Accountant,
            CompanyRole::Merchandiser,
        ] {
            assert!(can_manage_members(role));
        }
    }

    #[test]
    fn only_staff_is_scoped_to_their_own_requests() {
        for role in CompanyRole::ALL {
            let expected = if role == CompanyRole::Staff {
                RequestScope::Own
            } else {
                RequestScope::Company
            };
            assert_eq!(request_scope(role), expected);
        }
    }
}
