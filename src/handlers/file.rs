// src/handlers/file.rs

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
        rbac::{RemoveEntities, RequireRole},
    },
    models::file::{CreateFilePayload, File, FileDetail, UpdateFilePayload},
};

// POST /api/storages/{storage_id}/files
#[utoipa::path(
    post,
    path = "/api/storages/{storage_id}/files",
    tag = "Files",
    request_body = CreateFilePayload,
    responses(
        (status = 201, description = "Arquivo criado; para STAFF nasce invisível com pedido CREATE pendente", body = FileDetail),
        (status = 400, description = "storageUid não resolve para um DRAWER da empresa")
    ),
    params(
        ("storage_id" = Uuid, Path, description = "ID do storage da coleção")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_file(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    // O destino da criação é o storageUid do payload; o segmento do caminho
    // só ancora a coleção.
    Path(_storage_id): Path<Uuid>,
    Json(payload): Json<CreateFilePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .file_service
        .create(user.id, membership.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/storages/{storage_id}/files
#[utoipa::path(
    get,
    path = "/api/storages/{storage_id}/files",
    tag = "Files",
    responses(
        (status = 200, description = "Arquivos visíveis do storage", body = Vec<File>),
        (status = 400, description = "O storage do caminho não é um DRAWER ativo")
    ),
    params(
        ("storage_id" = Uuid, Path, description = "ID do storage (DRAWER)")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_files(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    Path(storage_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let files = app_state
        .file_service
        .list(user.id, membership.company_id, storage_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(files)))
}

// GET /api/storages/{storage_id}/files/{file_id}
#[utoipa::path(
    get,
    path = "/api/storages/{storage_id}/files/{file_id}",
    tag = "Files",
    responses(
        (status = 200, description = "Detalhe do arquivo com os vínculos", body = FileDetail),
        (status = 404, description = "Arquivo não encontrado neste storage")
    ),
    params(
        ("storage_id" = Uuid, Path, description = "ID do storage (DRAWER)"),
        ("file_id" = Uuid, Path, description = "ID do arquivo")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_file(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    Path((storage_id, file_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .file_service
        .get(user.id, membership.company_id, storage_id, file_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// PATCH /api/storages/{storage_id}/files/{file_id}
#[utoipa::path(
    patch,
    path = "/api/storages/{storage_id}/files/{file_id}",
    tag = "Files",
    request_body = UpdateFilePayload,
    responses(
        (status = 200, description = "Arquivo atualizado; para STAFF o estado fica intacto e sai um pedido UPDATE", body = FileDetail),
        (status = 400, description = "storageUid do patch não resolve para um DRAWER da empresa"),
        (status = 404, description = "Arquivo não encontrado neste storage")
    ),
    params(
        ("storage_id" = Uuid, Path, description = "ID do storage (DRAWER)"),
        ("file_id" = Uuid, Path, description = "ID do arquivo")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_file(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    Path((storage_id, file_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateFilePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .file_service
        .update(user.id, membership.company_id, storage_id, file_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// DELETE /api/storages/{storage_id}/files/{file_id}
#[utoipa::path(
    delete,
    path = "/api/storages/{storage_id}/files/{file_id}",
    tag = "Files",
    responses(
        (status = 204, description = "Arquivo marcado como REMOVED"),
        (status = 403, description = "Somente SUPER_ADMIN e ADMINISTRATOR removem"),
        (status = 404, description = "Arquivo não encontrado neste storage")
    ),
    params(
        ("storage_id" = Uuid, Path, description = "ID do storage (DRAWER)"),
        ("file_id" = Uuid, Path, description = "ID do arquivo")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_file(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    _guard: RequireRole<RemoveEntities>,
    Path((storage_id, file_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .file_service
        .remove(user.id, membership.company_id, storage_id, file_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
