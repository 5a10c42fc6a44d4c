// src/handlers/catalog.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::{ActiveMembership, AuthenticatedUser},
        i18n::Locale,
        rbac::{DirectWrite, RequireRole},
    },
    models::catalog::{
        Buyer, CreateBuyerPayload, CreateImagePayload, CreateNotePayload, CreateProjectPayload,
        Image, Note, Project,
    },
};

// POST /api/buyers
#[utoipa::path(
    post,
    path = "/api/buyers",
    tag = "Catalog",
    request_body = CreateBuyerPayload,
    responses(
        (status = 201, description = "Comprador criado", body = Buyer),
        (status = 403, description = "STAFF não escreve no catálogo")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_buyer(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    _guard: RequireRole<DirectWrite>,
    Json(payload): Json<CreateBuyerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let buyer = app_state
        .catalog_service
        .create_buyer(user.id, membership.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(buyer)))
}

// GET /api/buyers
#[utoipa::path(
    get,
    path = "/api/buyers",
    tag = "Catalog",
    responses(
        (status = 200, description = "Compradores ativos da empresa", body = Vec<Buyer>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_buyers(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
) -> Result<impl IntoResponse, ApiError> {
    let buyers = app_state
        .catalog_service
        .list_buyers(user.id, membership.company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(buyers)))
}

// POST /api/notes
#[utoipa::path(
    post,
    path = "/api/notes",
    tag = "Catalog",
    request_body = CreateNotePayload,
    responses(
        (status = 201, description = "Nota criada", body = Note),
        (status = 403, description = "STAFF não escreve no catálogo")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_note(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    _guard: RequireRole<DirectWrite>,
    Json(payload): Json<CreateNotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let note = app_state
        .catalog_service
        .create_note(user.id, membership.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(note)))
}

// GET /api/notes
#[utoipa::path(
    get,
    path = "/api/notes",
    tag = "Catalog",
    responses(
        (status = 200, description = "Notas ativas da empresa", body = Vec<Note>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_notes(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
) -> Result<impl IntoResponse, ApiError> {
    let notes = app_state
        .catalog_service
        .list_notes(user.id, membership.company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(notes)))
}

// POST /api/projects
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Catalog",
    request_body = CreateProjectPayload,
    responses(
        (status = 201, description = "Projeto criado", body = Project),
        (status = 403, description = "STAFF não escreve no catálogo")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    _guard: RequireRole<DirectWrite>,
    Json(payload): Json<CreateProjectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let project = app_state
        .catalog_service
        .create_project(user.id, membership.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(project)))
}

// GET /api/projects
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Catalog",
    responses(
        (status = 200, description = "Projetos ativos da empresa", body = Vec<Project>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_projects(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
) -> Result<impl IntoResponse, ApiError> {
    let projects = app_state
        .catalog_service
        .list_projects(user.id, membership.company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(projects)))
}

// POST /api/images
#[utoipa::path(
    post,
    path = "/api/images",
    tag = "Catalog",
    request_body = CreateImagePayload,
    responses(
        (status = 201, description = "Metadados de imagem criados", body = Image),
        (status = 403, description = "STAFF não escreve no catálogo")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_image(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
    _guard: RequireRole<DirectWrite>,
    Json(payload): Json<CreateImagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let image = app_state
        .catalog_service
        .create_image(user.id, membership.company_id, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(image)))
}

// GET /api/images
#[utoipa::path(
    get,
    path = "/api/images",
    tag = "Catalog",
    responses(
        (status = 200, description = "Imagens ativas da empresa", body = Vec<Image>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_images(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    ActiveMembership(membership): ActiveMembership,
) -> Result<impl IntoResponse, ApiError> {
    let images = app_state
        .catalog_service
        .list_images(user.id, membership.company_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(images)))
}
