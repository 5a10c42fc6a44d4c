// src/models/storage.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::company::EntityStatus;

// ---
// 1. StorageKind
// ---
// SPACE guarda amostras; DRAWER guarda arquivos de cabide. Storages se
// aninham pelo parent_id, sem restrição de tipo entre pai e filho.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "storage_kind", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum StorageKind {
    Space,
    Drawer,
}

// ---
// 2. Storage (o local físico)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Storage {
    pub id: Uuid,
    pub company_id: Uuid,
    pub created_by: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub kind: StorageKind,
    pub parent_id: Option<Uuid>,
    pub status: EntityStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 3. Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoragePayload {
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    pub kind: StorageKind,
    pub parent_uid: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStoragePayload {
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório."))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub kind: Option<StorageKind>,
    pub parent_uid: Option<Uuid>,
}

// Filtros da listagem (?kind=DRAWER&parentUid=...)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStoragesQuery {
    pub kind: Option<StorageKind>,
    pub parent_uid: Option<Uuid>,
}
