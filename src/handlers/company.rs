// src/handlers/company.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::{ActiveMembership, AuthenticatedUser},
        i18n::Locale,
        rbac::{ManageMembers, RequireRole, SuperAdminOnly},
    },
    models::company::{
        AddMemberPayload, AdminAttachMemberPayload, CompanyMembership, MemberRow, Membership,
        SwitchCompanyPayload, UpdateMemberPayload,
    },
};

// GET /api/users/me/companies
#[utoipa::path(
    get,
    path = "/api/users/me/companies",
    tag = "Users",
    responses(
        (status = 200, description = "Empresas das quais o usuário é membro", body = Vec<CompanyMembership>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let companies = app_state
        .membership_service
        .my_companies(user.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(companies)))
}

// POST /api/companies/switch
#[utoipa::path(
    post,
    path = "/api/companies/switch",
    tag = "Companies",
    request_body = SwitchCompanyPayload,
    responses(
        (status = 200, description = "Empresa ativa trocada", body = Membership),
        (status = 403, description = "O usuário não é membro da empresa alvo"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn switch_company(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<SwitchCompanyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let membership = app_state
        .membership_service
        .switch_company(user.id, payload.company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(membership)))
}

// GET /api/companies/members
#[utoipa::path(
    get,
    path = "/api/companies/members",
    tag = "Companies",
    responses(
        (status = 200, description = "Membros da empresa ativa", body = Vec<MemberRow>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_members(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
) -> Result<impl IntoResponse, ApiError> {
    let members = app_state
        .membership_service
        .list_members(user.id, membership.company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(members)))
}

// POST /api/companies/members
#[utoipa::path(
    post,
    path = "/api/companies/members",
    tag = "Companies",
    request_body = AddMemberPayload,
    responses(
        (status = 201, description = "Membro vinculado à empresa ativa", body = Membership),
        (status = 403, description = "Cargo do ator não gerencia o cargo pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_member(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    _guard: RequireRole<ManageMembers>,
    Json(payload): Json<AddMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let created = app_state
        .membership_service
        .add_member(user.id, membership.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(created)))
}

// PATCH /api/companies/members/{user_id}
#[utoipa::path(
    patch,
    path = "/api/companies/members/{user_id}",
    tag = "Companies",
    request_body = UpdateMemberPayload,
    responses(
        (status = 200, description = "Cargo do membro atualizado", body = Membership),
        (status = 403, description = "Cargo do ator não gerencia o cargo atual ou o novo"),
        (status = 404, description = "Membro não encontrado na empresa ativa")
    ),
    params(
        ("user_id" = Uuid, Path, description = "ID do usuário membro")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_member_role(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    _guard: RequireRole<ManageMembers>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state
        .membership_service
        .update_member_role(user.id, membership.company_id, user_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}

// POST /api/admin/members
#[utoipa::path(
    post,
    path = "/api/admin/members",
    tag = "Companies",
    request_body = AdminAttachMemberPayload,
    responses(
        (status = 201, description = "Usuário vinculado à empresa indicada", body = Membership),
        (status = 403, description = "Somente SUPER_ADMIN"),
        (status = 404, description = "Empresa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn admin_attach_member(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireRole<SuperAdminOnly>,
    Json(payload): Json<AdminAttachMemberPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let created = app_state
        .membership_service
        .admin_attach(user.id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(created)))
}
