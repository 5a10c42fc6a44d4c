// src/models/file.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::models::company::EntityStatus;
use crate::models::request::{parse_field, parse_opt_field};

// ---
// 1. File (o arquivo físico de cabide)
// ---
// "Arquivo" aqui é o objeto físico guardado num DRAWER, não um blob.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: Uuid,
    pub company_id: Uuid,
    pub storage_id: Uuid,
    pub created_by: Uuid,
    pub file_id: Option<String>,
    pub name: String,
    pub comments: Option<String>,
    pub status: EntityStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl File {
    pub fn seed(company_id: Uuid, created_by: Uuid, storage_id: Uuid) -> Self {
        let now = Utc::now();
        File {
            id: Uuid::new_v4(),
            company_id,
            storage_id,
            created_by,
            file_id: None,
            name: String::new(),
            comments: None,
            status: EntityStatus::Active,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mesma rotina de patch das amostras, sem normalização: arquivos não
    /// têm peso nem tamanho.
    pub fn apply_fields(&mut self, fields: &serde_json::Map<String, Value>) -> Result<(), AppError> {
        for (key, value) in fields {
            match key.as_str() {
                "fileId" => self.file_id = parse_opt_field(value, "fileId")?,
                "name" => self.name = parse_field(value, "name")?,
                "comments" => self.comments = parse_opt_field(value, "comments")?,
                _ => {} // chave desconhecida
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileDetail {
    #[serde(flatten)]
    pub file: File,
    pub image_uids: Vec<Uuid>,
    pub note_uids: Vec<Uuid>,
    pub buyer_uids: Vec<Uuid>,
    pub project_uids: Vec<Uuid>,
}

// ---
// 2. Payloads
// ---

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFilePayload {
    pub storage_uid: Uuid,
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[validate(length(max = 10, message = "No máximo 10 imagens por arquivo."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_uids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_uids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_uids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_uids: Option<Vec<Uuid>>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFilePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_uid: Option<Uuid>,
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[validate(length(max = 10, message = "No máximo 10 imagens por arquivo."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_uids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_uids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_uids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_uids: Option<Vec<Uuid>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn fields(value: Value) -> serde_json::Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("esperava um objeto JSON"),
        }
    }

    #[test]
    fn patch_applies_known_fields_and_skips_the_rest() {
        let mut file = File::seed(uid(1), uid(2), uid(3));
        file.apply_fields(&fields(json!({
            "fileId": "F-102",
            "name": "Arquivo verão 26",
            "weight": 500,
        })))
        .unwrap();

        assert_eq!(file.file_id.as_deref(), Some("F-102"));
        assert_eq!(file.name, "Arquivo verão 26");
    }

    #[test]
    fn null_clears_optional_fields() {
        let mut file = File::seed(uid(1), uid(2), uid(3));
        file.apply_fields(&fields(json!({"comments": "separar para SPFW"})))
            .unwrap();
        file.apply_fields(&fields(json!({"comments": null})))
            .unwrap();

        assert_eq!(file.comments, None);
    }

    #[test]
    fn ill_typed_name_is_a_validation_error() {
        let mut file = File::seed(uid(1), uid(2), uid(3));
        let err = file
            .apply_fields(&fields(json!({"name": ["x"]})))
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidFieldValue { field } if field == "name"));
    }
}
