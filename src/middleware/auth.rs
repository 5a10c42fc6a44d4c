// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::User,
    models::company::Membership,
};

// Valida o Bearer token e pendura o usuário nos extensions da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let user = app_state.auth_service.validate_token(token).await?;

            request.extensions_mut().insert(user);
            return Ok(next.run(request).await);
        }
    }

    tracing::warn!("Requisição recusada: sem Bearer token");
    Err(AppError::InvalidToken)
}

// Resolve a empresa ativa do usuário autenticado e pendura o membership.
// Handlers atrás deste guard sempre têm um contexto de empresa; quem não
// selecionou empresa nenhuma recebe 403 aqui.
pub async fn membership_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or(AppError::InvalidToken)?;

    let membership = app_state
        .company_repo
        .active_membership(user.id)
        .await?
        .ok_or(AppError::NoActiveMembership)?;

    request.extensions_mut().insert(membership);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::InvalidToken)
    }
}

// O membership ativo colocado pelo membership_guard.
pub struct ActiveMembership(pub Membership);

impl<S> FromRequestParts<S> for ActiveMembership
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Membership>()
            .cloned()
            .map(ActiveMembership)
            .ok_or(AppError::NoActiveMembership)
    }
}
