// src/handlers/storage.rs

use axum::{
    extract::{Path, Query, State},
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
        rbac::{ManageStorages, RemoveEntities, RequireRole},
    },
    models::storage::{
        CreateStoragePayload, ListStoragesQuery, Storage, StorageKind, UpdateStoragePayload,
    },
};

// POST /api/storages
#[utoipa::path(
    post,
    path = "/api/storages",
    tag = "Storages",
    request_body = CreateStoragePayload,
    responses(
        (status = 201, description = "Storage criado", body = Storage),
        (status = 400, description = "parentUid não resolve dentro da empresa"),
        (status = 403, description = "Cargo sem gestão de storages")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_storage(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    _guard: RequireRole<ManageStorages>,
    Json(payload): Json<CreateStoragePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let storage = app_state
        .storage_service
        .create(user.id, membership.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(storage)))
}

// GET /api/storages
#[utoipa::path(
    get,
    path = "/api/storages",
    tag = "Storages",
    responses(
        (status = 200, description = "Storages da empresa ativa", body = Vec<Storage>)
    ),
    params(
        ("kind" = Option<StorageKind>, Query, description = "Filtra por tipo (SPACE ou DRAWER)"),
        ("parentUid" = Option<Uuid>, Query, description = "Filtra pelos filhos de um storage")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_storages(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    Query(query): Query<ListStoragesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let storages = app_state
        .storage_service
        .list(user.id, membership.company_id, &query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(storages)))
}

// GET /api/storages/{storage_id}
#[utoipa::path(
    get,
    path = "/api/storages/{storage_id}",
    tag = "Storages",
    responses(
        (status = 200, description = "Detalhe do storage", body = Storage),
        (status = 404, description = "Storage não encontrado ou não ativo")
    ),
    params(
        ("storage_id" = Uuid, Path, description = "ID do storage")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_storage(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    Path(storage_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let storage = app_state
        .storage_service
        .get(user.id, membership.company_id, storage_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(storage)))
}

// PATCH /api/storages/{storage_id}
#[utoipa::path(
    patch,
    path = "/api/storages/{storage_id}",
    tag = "Storages",
    request_body = UpdateStoragePayload,
    responses(
        (status = 200, description = "Storage atualizado", body = Storage),
        (status = 400, description = "parentUid não resolve dentro da empresa"),
        (status = 403, description = "Cargo sem gestão de storages"),
        (status = 404, description = "Storage não encontrado ou não ativo")
    ),
    params(
        ("storage_id" = Uuid, Path, description = "ID do storage")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_storage(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    _guard: RequireRole<ManageStorages>,
    Path(storage_id): Path<Uuid>,
    Json(payload): Json<UpdateStoragePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let storage = app_state
        .storage_service
        .update(user.id, membership.company_id, storage_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(storage)))
}

// DELETE /api/storages/{storage_id}
#[utoipa::path(
    delete,
    path = "/api/storages/{storage_id}",
    tag = "Storages",
    responses(
        (status = 204, description = "Storage marcado como REMOVED"),
        (status = 403, description = "Somente SUPER_ADMIN e ADMINISTRATOR removem"),
        (status = 404, description = "Storage não encontrado ou não ativo")
    ),
    params(
        ("storage_id" = Uuid, Path, description = "ID do storage")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_storage(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    _guard: RequireRole<RemoveEntities>,
    Path(storage_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .storage_service
        .remove(user.id, membership.company_id, storage_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
