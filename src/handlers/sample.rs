// src/handlers/sample.rs

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
    models::sample::{CreateSamplePayload, Sample, SampleDetail, UpdateSamplePayload},
};

// POST /api/storages/{storage_id}/samples
#[utoipa::path(
    post,
    path = "/api/storages/{storage_id}/samples",
    tag = "Samples",
    request_body = CreateSamplePayload,
    responses(
        (status = 201, description = "Amostra criada; para STAFF nasce invisível com pedido CREATE pendente", body = SampleDetail),
        (status = 400, description = "storageUid não resolve para um SPACE da empresa")
    ),
    params(
        ("storage_id" = Uuid, Path, description = "ID do storage da coleção")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sample(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    // O destino da criação é o storageUid do payload; o segmento do caminho
    // só ancora a coleção.
    Path(_storage_id): Path<Uuid>,
    Json(payload): Json<CreateSamplePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .sample_service
        .create(user.id, membership.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(detail)))
}

// GET /api/storages/{storage_id}/samples
#[utoipa::path(
    get,
    path = "/api/storages/{storage_id}/samples",
    tag = "Samples",
    responses(
        (status = 200, description = "Amostras visíveis do storage", body = Vec<Sample>),
        (status = 400, description = "O storage do caminho não é um SPACE ativo")
    ),
    params(
        ("storage_id" = Uuid, Path, description = "ID do storage (SPACE)")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_samples(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    Path(storage_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let samples = app_state
        .sample_service
        .list(user.id, membership.company_id, storage_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(samples)))
}

// GET /api/storages/{storage_id}/samples/{sample_id}
#[utoipa::path(
    get,
    path = "/api/storages/{storage_id}/samples/{sample_id}",
    tag = "Samples",
    responses(
        (status = 200, description = "Detalhe da amostra com os vínculos", body = SampleDetail),
        (status = 404, description = "Amostra não encontrada neste storage")
    ),
    params(
        ("storage_id" = Uuid, Path, description = "ID do storage (SPACE)"),
        ("sample_id" = Uuid, Path, description = "ID da amostra")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sample(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    Path((storage_id, sample_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = app_state
        .sample_service
        .get(user.id, membership.company_id, storage_id, sample_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// PATCH /api/storages/{storage_id}/samples/{sample_id}
#[utoipa::path(
    patch,
    path = "/api/storages/{storage_id}/samples/{sample_id}",
    tag = "Samples",
    request_body = UpdateSamplePayload,
    responses(
        (status = 200, description = "Amostra atualizada; para STAFF o estado fica intacto e sai um pedido UPDATE", body = SampleDetail),
        (status = 400, description = "storageUid do patch não resolve para um SPACE da empresa"),
        (status = 404, description = "Amostra não encontrada neste storage")
    ),
    params(
        ("storage_id" = Uuid, Path, description = "ID do storage (SPACE)"),
        ("sample_id" = Uuid, Path, description = "ID da amostra")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_sample(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    Path((storage_id, sample_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateSamplePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let detail = app_state
        .sample_service
        .update(user.id, membership.company_id, storage_id, sample_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(detail)))
}

// DELETE /api/storages/{storage_id}/samples/{sample_id}
#[utoipa::path(
    delete,
    path = "/api/storages/{storage_id}/samples/{sample_id}",
    tag = "Samples",
    responses(
        (status = 204, description = "Amostra marcada como REMOVED"),
        (status = 403, description = "Somente SUPER_ADMIN e ADMINISTRATOR removem"),
        (status = 404, description = "Amostra não encontrada neste storage")
    ),
    params(
        ("storage_id" = Uuid, Path, description = "ID do storage (SPACE)"),
        ("sample_id" = Uuid, Path, description = "ID da amostra")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_sample(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    _guard: RequireRole<RemoveEntities>,
    Path((storage_id, sample_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .sample_service
        .remove(user.id, membership.company_id, storage_id, sample_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
