// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Valor de tipo errado num campo do patch (ex.: peso como texto).
    #[error("Valor inválido para o campo '{field}'")]
    InvalidFieldValue { field: String },

    // Referência de storage (storage_uid/parent_uid) que não resolve para
    // um registro utilizável dentro da empresa.
    #[error("Nenhum storage encontrado com esse uid")]
    StorageNotFoundForKind,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Telefone já existe")]
    PhoneAlreadyExists,

    #[error("Usuário já é membro desta empresa")]
    MembershipAlreadyExists,

    // Pedido já aprovado ou rejeitado; nunca re-aplicamos um veredito.
    #[error("Pedido já resolvido")]
    RequestAlreadyResolved,

    #[error("Violação de chave única: {0}")]
    UniqueConstraintViolation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Nenhuma empresa ativa")]
    NoActiveMembership,

    #[error("Não é membro da empresa")]
    NotACompanyMember,

    // O cargo do ator não está na tabela de elegibilidade da operação.
    #[error("Cargo sem permissão para esta operação")]
    RoleNotAllowed,

    // Hierarquia: o ator só gerencia cargos estritamente abaixo do seu.
    #[error("Cargo do alvo não é gerenciável pelo ator")]
    CannotManageRole,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Empresa não encontrada")]
    CompanyNotFound,

    #[error("Membro não encontrado")]
    MembershipNotFound,

    #[error("Storage não encontrado")]
    StorageNotFound,

    #[error("Amostra não encontrada")]
    SampleNotFound,

    #[error("Arquivo não encontrado")]
    FileNotFound,

    #[error("Pedido não encontrado")]
    RequestNotFound,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de serialização")]
    SerializationError(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Status HTTP e chave do catálogo de mensagens para cada variante.
    pub fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
            AppError::InvalidFieldValue { .. } => (StatusCode::BAD_REQUEST, "invalid_field_value"),
            AppError::StorageNotFoundForKind => (StatusCode::BAD_REQUEST, "storage_not_found_for_kind"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "email_already_exists"),
            AppError::PhoneAlreadyExists => (StatusCode::CONFLICT, "phone_already_exists"),
            AppError::MembershipAlreadyExists => (StatusCode::CONFLICT, "membership_already_exists"),
            AppError::RequestAlreadyResolved => (StatusCode::CONFLICT, "request_already_resolved"),
            AppError::UniqueConstraintViolation(_) => (StatusCode::CONFLICT, "unique_violation"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::NoActiveMembership => (StatusCode::FORBIDDEN, "no_active_membership"),
            AppError::NotACompanyMember => (StatusCode::FORBIDDEN, "not_a_company_member"),
            AppError::RoleNotAllowed => (StatusCode::FORBIDDEN, "role_not_allowed"),
            AppError::CannotManageRole => (StatusCode::FORBIDDEN, "cannot_manage_role"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found"),
            AppError::CompanyNotFound => (StatusCode::NOT_FOUND, "company_not_found"),
            AppError::MembershipNotFound => (StatusCode::NOT_FOUND, "membership_not_found"),
            AppError::StorageNotFound => (StatusCode::NOT_FOUND, "storage_not_found"),
            AppError::SampleNotFound => (StatusCode::NOT_FOUND, "sample_not_found"),
            AppError::FileNotFound => (StatusCode::NOT_FOUND, "file_not_found"),
            AppError::RequestNotFound => (StatusCode::NOT_FOUND, "request_not_found"),
            AppError::DatabaseError(_)
            | AppError::SerializationError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Converte o erro de domínio na resposta localizada da API.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro interno do servidor: {}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut map = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    map.insert(field.to_string(), messages);
                }
                Some(json!(map))
            }
            AppError::InvalidFieldValue { field } => Some(json!({ "field": field })),
            AppError::UniqueConstraintViolation(constraint) => {
                Some(json!({ "constraint": constraint }))
            }
            _ => None,
        };

        ApiError {
            status,
            error: i18n.message(&locale.0, key).to_string(),
            details,
        }
    }
}

// ---
// Resposta de erro da API: status + mensagem já localizada.
// ---
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.error,
            "details": self.details,
        }));
        (self.status, body).into_response()
    }
}

// Fallback para caminhos que respondem AppError direto, sem Locale.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::new())
            .into_response()
    }
}
