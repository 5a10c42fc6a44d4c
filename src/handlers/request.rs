// src/handlers/request.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::{ActiveMembership, AuthenticatedUser},
        i18n::Locale,
        rbac::{RequireRole, ResolveRequests},
    },
    models::request::{ModifyRequest, ResolveRequestPayload},
};

// GET /api/requests
#[utoipa::path(
    get,
    path = "/api/requests",
    tag = "Requests",
    responses(
        (status = 200, description = "Pedidos de modificação no escopo do cargo (STAFF vê só os próprios)", body = Vec<ModifyRequest>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_requests(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
) -> Result<impl IntoResponse, ApiError> {
    let requests = app_state
        .request_service
        .list(user.id, membership.company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(requests)))
}

// GET /api/requests/{request_id}
#[utoipa::path(
    get,
    path = "/api/requests/{request_id}",
    tag = "Requests",
    responses(
        (status = 200, description = "Detalhe do pedido", body = ModifyRequest),
        (status = 404, description = "Pedido não encontrado (ou fora do escopo do ator)")
    ),
    params(
        ("request_id" = Uuid, Path, description = "ID do pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_request(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .request_service
        .get(user.id, membership.company_id, request_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(request)))
}

// PATCH /api/requests/{request_id}
#[utoipa::path(
    patch,
    path = "/api/requests/{request_id}",
    tag = "Requests",
    request_body = ResolveRequestPayload,
    responses(
        (status = 200, description = "Veredito aplicado; aprovação reexecuta o patch capturado", body = ModifyRequest),
        (status = 403, description = "Cargo não resolve pedidos"),
        (status = 404, description = "Pedido não encontrado"),
        (status = 409, description = "Pedido já resolvido")
    ),
    params(
        ("request_id" = Uuid, Path, description = "ID do pedido")
    ),
    security(("api_jwt" = []))
)]
pub async fn resolve_request(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    _guard: RequireRole<ResolveRequests>,
    Path(request_id): Path<Uuid>,
    Json(payload): Json<ResolveRequestPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let resolved = app_state
        .request_service
        .resolve(user.id, membership.company_id, request_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(resolved)))
}
