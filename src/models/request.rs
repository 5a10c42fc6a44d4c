// src/models/request.rs

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;

// ---
// 1. Enums do fluxo de moderação
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_entity", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum RequestedFrom {
    Sample,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_action", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestedAction {
    Create,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

// ---
// 2. RequestedData (o documento de patch capturado)
// ---
// Os valores escalares ficam no mapa achatado, crus, exatamente como vieram
// do payload; a normalização de peso/tamanho só acontece na aplicação.
// As cinco chaves reservadas saem do mapa na desserialização e voltam na
// serialização, então o replay enxerga o mesmo documento que a captura.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestedData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_uid: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_uids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_uids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_uids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_uids: Option<Vec<Uuid>>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub fields: serde_json::Map<String, Value>,
}

impl RequestedData {
    /// Converte um payload de escrita no documento de patch. Depende do
    /// `skip_serializing_if` dos payloads: campo ausente = chave ausente.
    pub fn from_payload<T: Serialize>(payload: &T) -> Result<Self, AppError> {
        let value = serde_json::to_value(payload)?;
        let data = serde_json::from_value(value)?;
        Ok(data)
    }

    /// Os quatro conjuntos de vínculo na ordem canônica; `None` significa
    /// "chave ausente do patch" (não mexer), nunca "limpar".
    pub fn association_sets(&self) -> [(AssociationKind, Option<&Vec<Uuid>>); 4] {
        [
            (AssociationKind::Images, self.image_uids.as_ref()),
            (AssociationKind::Notes, self.note_uids.as_ref()),
            (AssociationKind::Buyers, self.buyer_uids.as_ref()),
            (AssociationKind::Projects, self.project_uids.as_ref()),
        ]
    }

    /// Captura para pedidos UPDATE: cada chave reservada ausente é completada
    /// com o estado atual da entidade, de forma independente por tipo. Uma
    /// lista fornecida (mesmo vazia) é mantida como veio.
    pub fn defaulted_for_update(mut self, current_storage: Uuid, linked: &AssociationSnapshot) -> Self {
        if self.storage_uid.is_none() {
            self.storage_uid = Some(current_storage);
        }
        if self.image_uids.is_none() {
            self.image_uids = Some(linked.images.clone());
        }
        if self.note_uids.is_none() {
            self.note_uids = Some(linked.notes.clone());
        }
        if self.buyer_uids.is_none() {
            self.buyer_uids = Some(linked.buyers.clone());
        }
        if self.project_uids.is_none() {
            self.project_uids = Some(linked.projects.clone());
        }
        self
    }
}

// Ids atualmente vinculados a uma amostra ou arquivo, por tipo.
#[derive(Debug, Clone, Default)]
pub struct AssociationSnapshot {
    pub images: Vec<Uuid>,
    pub notes: Vec<Uuid>,
    pub buyers: Vec<Uuid>,
    pub projects: Vec<Uuid>,
}

// Os quatro tipos de vínculo que amostras e arquivos carregam.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationKind {
    Images,
    Notes,
    Buyers,
    Projects,
}

// ---
// 3. ModifyRequest
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModifyRequest {
    pub id: Uuid,
    pub company_id: Uuid,
    pub requested_by: Uuid,
    pub responded_by: Option<Uuid>,
    pub storage_id: Option<Uuid>,
    pub sample_id: Option<Uuid>,
    pub file_id: Option<Uuid>,
    pub requested_from: RequestedFrom,
    pub requested_action: RequestedAction,
    pub status: RequestStatus,
    #[schema(value_type = Object)]
    pub requested_data: sqlx::types::Json<RequestedData>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ModifyRequest {
    /// Pedido já resolvido não é resolvido de novo (conflito, nunca re-aplicação).
    pub fn ensure_pending(&self) -> Result<(), AppError> {
        match self.status {
            RequestStatus::Pending => Ok(()),
            _ => Err(AppError::RequestAlreadyResolved),
        }
    }
}

// Veredito enviado no PATCH /requests/{id}.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequestPayload {
    pub status: RequestVerdict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestVerdict {
    Accepted,
    Rejected,
}

// ---
// 4. Parsing de campos do patch
// ---

/// Converte um valor JSON do patch para o tipo do campo; valor de tipo
/// errado vira erro de validação apontando o campo.
pub(crate) fn parse_field<T: DeserializeOwned>(value: &Value, field: &'static str) -> Result<T, AppError> {
    serde_json::from_value(value.clone()).map_err(|_| AppError::InvalidFieldValue {
        field: field.to_string(),
    })
}

/// Variante para campos opcionais: `null` limpa o campo.
pub(crate) fn parse_opt_field<T: DeserializeOwned>(
    value: &Value,
    field: &'static str,
) -> Result<Option<T>, AppError> {
    parse_field::<Option<T>>(value, field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uid(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    #[test]
    fn reserved_keys_leave_the_flat_map_on_deserialization() {
        let raw = json!({
            "name": "Jaqueta jeans",
            "weight": 2.5,
            "storageUid": uid(1),
            "imageUids": [uid(2), uid(3)],
        });
        let data: RequestedData = serde_json::from_value(raw).unwrap();

        assert_eq!(data.storage_uid, Some(uid(1)));
        assert_eq!(data.image_uids.as_deref(), Some(&[uid(2), uid(3)][..]));
        assert!(data.note_uids.is_none());
        assert_eq!(data.fields.len(), 2);
        assert!(data.fields.contains_key("name"));
        assert!(data.fields.contains_key("weight"));
        assert!(!data.fields.contains_key("storageUid"));
    }

    #[test]
    fn round_trip_is_lossless() {
        let raw = json!({
            "name": "Camisa polo",
            "weight": 0.75,
            "weightType": "KG",
            "arrivalDate": "2026-03-10T12:00:00Z",
            "storageUid": uid(7),
            "buyerUids": [],
        });
        let data: RequestedData = serde_json::from_value(raw.clone()).unwrap();
        let back = serde_json::to_value(&data).unwrap();

        // O replay precisa enxergar exatamente o que a captura gravou,
        // inclusive o peso ainda em KG (cru).
        assert_eq!(back, raw);
    }

    #[test]
    fn defaulting_fills_only_the_missing_kinds() {
        let provided: RequestedData = serde_json::from_value(json!({
            "imageUids": [],
            "noteUids": [uid(9)],
        }))
        .unwrap();
        let linked = AssociationSnapshot {
            images: vec![uid(1)],
            notes: vec![uid(2)],
            buyers: vec![uid(3)],
            projects: vec![uid(4)],
        };

        let data = provided.defaulted_for_update(uid(50), &linked);

        // Lista vazia fornecida significa "limpar", não default.
        assert_eq!(data.image_uids.as_deref(), Some(&[][..]));
        assert_eq!(data.note_uids.as_deref(), Some(&[uid(9)][..]));
        // Ausentes herdam o vínculo atual.
        assert_eq!(data.buyer_uids.as_deref(), Some(&[uid(3)][..]));
        assert_eq!(data.project_uids.as_deref(), Some(&[uid(4)][..]));
        assert_eq!(data.storage_uid, Some(uid(50)));
    }

    #[test]
    fn resolved_requests_refuse_a_second_verdict() {
        let mut request = ModifyRequest {
            id: uid(1),
            company_id: uid(2),
            requested_by: uid(3),
            responded_by: None,
            storage_id: None,
            sample_id: Some(uid(4)),
            file_id: None,
            requested_from: RequestedFrom::Sample,
            requested_action: RequestedAction::Update,
            status: RequestStatus::Pending,
            requested_data: sqlx::types::Json(RequestedData::default()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(request.ensure_pending().is_ok());

        request.status = RequestStatus::Accepted;
        assert!(matches!(
            request.ensure_pending(),
            Err(AppError::RequestAlreadyResolved)
        ));

        request.status = RequestStatus::Rejected;
        assert!(matches!(
            request.ensure_pending(),
            Err(AppError::RequestAlreadyResolved)
        ));
    }
}
