// src/models/sample.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
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
// 1. Unidades e tipos
// ---
// O peso canônico é sempre em gramas; KG só existe na entrada e é
// convertido (x1000) na aplicação do patch, nunca na captura.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "weight_unit", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum WeightUnit {
    Gm,
    Kg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "size_unit", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SizeUnit {
    Centimeter,
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sample_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SampleKind {
    Development,
    Salesman,
    Styling,
    Shipping,
    Fit,
    Production,
    PreProduction,
    Counter,
    SizeSet,
    Original,
}

// ---
// 2. Sample (a amostra de vestuário)
// ---
// `is_active` é a visibilidade controlada pela moderação (um CREATE de
// STAFF nasce invisível); `status` é o ciclo de vida normal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub id: Uuid,
    pub company_id: Uuid,
    pub storage_id: Uuid,
    pub created_by: Uuid,
    pub sample_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub arrival_date: Option<DateTime<Utc>>,
    pub style_no: Option<String>,
    pub sku_no: Option<String>,
    pub item: Option<String>,
    pub fabrication: Option<String>,
    pub weight: Option<Decimal>,
    pub weight_type: WeightUnit,
    pub color: Option<String>,
    pub size: Option<String>,
    pub size_type: SizeUnit,
    pub size_cm: Option<Decimal>,
    pub kind: SampleKind,
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub comments: Option<String>,
    pub status: EntityStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sample {
    /// Estado inicial de uma amostra recém-criada; os campos vêm do patch.
    pub fn seed(company_id: Uuid, created_by: Uuid, storage_id: Uuid) -> Self {
        let now = Utc::now();
        Sample {
            id: Uuid::new_v4(),
            company_id,
            storage_id,
            created_by,
            sample_id: None,
            name: String::new(),
            description: None,
            arrival_date: None,
            style_no: None,
            sku_no: None,
            item: None,
            fabrication: None,
            weight: None,
            weight_type: WeightUnit::Gm,
            color: None,
            size: None,
            size_type: SizeUnit::Letter,
            size_cm: None,
            kind: SampleKind::Development,
            category: None,
            sub_category: None,
            comments: None,
            status: EntityStatus::Active,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Aplica os campos escalares de um patch sobre o estado atual.
    ///
    /// Chaves desconhecidas são ignoradas; valor de tipo errado é erro de
    /// validação. A normalização roda uma única vez, aqui: peso em KG vira
    /// gramas (x1000, unidade volta a GM) e tamanho sob CENTIMETER deriva
    /// `size_cm` do valor cru. Tanto a escrita direta quanto o replay de um
    /// pedido aprovado passam por esta rotina.
    pub fn apply_fields(&mut self, fields: &serde_json::Map<String, Value>) -> Result<(), AppError> {
        let mut incoming_weight: Option<Decimal> = None;
        let mut incoming_size: Option<String> = None;

        for (key, value) in fields {
            match key.as_str() {
                "sampleId" => self.sample_id = parse_opt_field(value, "sampleId")?,
                "name" => self.name = parse_field(value, "name")?,
                "description" => self.description = parse_opt_field(value, "description")?,
                "arrivalDate" => self.arrival_date = parse_opt_field(value, "arrivalDate")?,
                "styleNo" => self.style_no = parse_opt_field(value, "styleNo")?,
                "skuNo" => self.sku_no = parse_opt_field(value, "skuNo")?,
                "item" => self.item = parse_opt_field(value, "item")?,
                "fabrication" => self.fabrication = parse_opt_field(value, "fabrication")?,
                "weight" => incoming_weight = parse_opt_field(value, "weight")?,
                "weightType" => self.weight_type = parse_field(value, "weightType")?,
                "color" => self.color = parse_opt_field(value, "color")?,
                "size" => {
                    incoming_size = parse_opt_field(value, "size")?;
                    self.size = incoming_size.clone();
                }
                "sizeType" => self.size_type = parse_field(value, "sizeType")?,
                "kind" => self.kind = parse_field(value, "kind")?,
                "category" => self.category = parse_opt_field(value, "category")?,
                "subCategory" => self.sub_category = parse_opt_field(value, "subCategory")?,
                "comments" => self.comments = parse_opt_field(value, "comments")?,
                _ => {} // chave desconhecida
            }
        }

        // Normalização do peso: a unidade efetiva é a do patch, se veio.
        if let Some(w) = incoming_weight {
            if self.weight_type == WeightUnit::Kg {
                self.weight = Some(w * Decimal::from(1000));
                self.weight_type = WeightUnit::Gm;
            } else {
                self.weight = Some(w);
            }
        } else if fields.contains_key("weight") {
            // weight: null limpa o campo sem tocar na unidade.
            self.weight = None;
        }

        // Derivação do tamanho em centímetros, a partir do valor cru.
        if let Some(raw) = incoming_size {
            if self.size_type == SizeUnit::Centimeter {
                let cm = raw.trim().parse::<Decimal>().map_err(|_| AppError::InvalidFieldValue {
                    field: "size".to_string(),
                })?;
                self.size_cm = Some(cm);
            }
        }

        Ok(())
    }
}

// Detalhe com os vínculos, usado nas respostas de criação e de consulta.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SampleDetail {
    #[serde(flatten)]
    pub sample: Sample,
    pub image_uids: Vec<Uuid>,
    pub note_uids: Vec<Uuid>,
    pub buyer_uids: Vec<Uuid>,
    pub project_uids: Vec<Uuid>,
}

// ---
// 3. Payloads
// ---
// Os payloads também viram documento de patch (RequestedData), então todo
// campo opcional precisa sumir do JSON quando ausente.

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSamplePayload {
    pub storage_uid: Uuid,
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório."))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fabrication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_type: Option<WeightUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_type: Option<SizeUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<SampleKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[validate(length(max = 3, message = "No máximo 3 imagens por amostra."))]
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
pub struct UpdateSamplePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_uid: Option<Uuid>,
    #[validate(length(min = 1, max = 255, message = "O nome é obrigatório."))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fabrication: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_type: Option<WeightUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_type: Option<SizeUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<SampleKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[validate(length(max = 3, message = "No máximo 3 imagens por amostra."))]
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

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn weight_in_kg_is_stored_in_grams_with_unit_reset() {
        let mut sample = Sample::seed(uid(1), uid(2), uid(3));
        sample
            .apply_fields(&fields(json!({"weight": 2.5, "weightType": "KG"})))
            .unwrap();

        assert_eq!(sample.weight, Some(dec("2500")));
        assert_eq!(sample.weight_type, WeightUnit::Gm);
    }

    #[test]
    fn weight_in_grams_is_stored_as_is() {
        let mut sample = Sample::seed(uid(1), uid(2), uid(3));
        sample
            .apply_fields(&fields(json!({"weight": 300})))
            .unwrap();

        assert_eq!(sample.weight, Some(dec("300")));
        assert_eq!(sample.weight_type, WeightUnit::Gm);
    }

    #[test]
    fn kg_conversion_uses_the_effective_unit_from_an_earlier_patch() {
        let mut sample = Sample::seed(uid(1), uid(2), uid(3));
        // Primeiro patch só muda a unidade; nada a converter ainda.
        sample
            .apply_fields(&fields(json!({"weightType": "KG"})))
            .unwrap();
        assert_eq!(sample.weight, None);
        assert_eq!(sample.weight_type, WeightUnit::Kg);

        // Peso que chega depois converte contra a unidade vigente.
        sample.apply_fields(&fields(json!({"weight": 2}))).unwrap();
        assert_eq!(sample.weight, Some(dec("2000")));
        assert_eq!(sample.weight_type, WeightUnit::Gm);
    }

    #[test]
    fn null_weight_clears_the_field() {
        let mut sample = Sample::seed(uid(1), uid(2), uid(3));
        sample
            .apply_fields(&fields(json!({"weight": 120})))
            .unwrap();
        sample
            .apply_fields(&fields(json!({"weight": null})))
            .unwrap();

        assert_eq!(sample.weight, None);
    }

    #[test]
    fn size_under_centimeter_derives_size_cm_from_the_raw_value() {
        let mut sample = Sample::seed(uid(1), uid(2), uid(3));
        sample
            .apply_fields(&fields(json!({"size": "42.5", "sizeType": "CENTIMETER"})))
            .unwrap();

        assert_eq!(sample.size.as_deref(), Some("42.5"));
        assert_eq!(sample.size_cm, Some(dec("42.5")));
    }

    #[test]
    fn size_under_letter_keeps_size_cm_untouched() {
        let mut sample = Sample::seed(uid(1), uid(2), uid(3));
        sample
            .apply_fields(&fields(json!({"size": "M", "sizeType": "LETTER"})))
            .unwrap();

        assert_eq!(sample.size.as_deref(), Some("M"));
        assert_eq!(sample.size_cm, None);
    }

    #[test]
    fn non_numeric_size_under_centimeter_is_a_validation_error() {
        let mut sample = Sample::seed(uid(1), uid(2), uid(3));
        let err = sample
            .apply_fields(&fields(json!({"size": "M", "sizeType": "CENTIMETER"})))
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidFieldValue { field } if field == "size"));
    }

    #[test]
    fn replaying_the_raw_capture_matches_the_direct_write() {
        // O documento capturado guarda o peso cru em KG; aplicado uma vez
        // no caminho direto e uma vez no replay, o resultado é o mesmo
        // (a conversão nunca roda duas vezes sobre o mesmo valor).
        let captured = fields(json!({
            "name": "Vestido midi",
            "weight": 1.2,
            "weightType": "KG",
            "size": "38",
            "sizeType": "CENTIMETER",
        }));

        let mut direct = Sample::seed(uid(1), uid(2), uid(3));
        direct.apply_fields(&captured).unwrap();

        let mut replayed = Sample::seed(uid(1), uid(2), uid(3));
        replayed.apply_fields(&captured).unwrap();

        assert_eq!(direct.weight, Some(dec("1200")));
        assert_eq!(replayed.weight, direct.weight);
        assert_eq!(replayed.weight_type, direct.weight_type);
        assert_eq!(replayed.size_cm, direct.size_cm);
        assert_eq!(replayed.name, direct.name);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut sample = Sample::seed(uid(1), uid(2), uid(3));
        let before = sample.clone();
        sample
            .apply_fields(&fields(json!({"somethingElse": 42, "status": "REMOVED"})))
            .unwrap();

        // `status` não é patchável pelo payload; nada mudou.
        assert_eq!(sample.status, before.status);
        assert_eq!(sample.name, before.name);
    }

    #[test]
    fn ill_typed_value_names_the_offending_field() {
        let mut sample = Sample::seed(uid(1), uid(2), uid(3));
        let err = sample
            .apply_fields(&fields(json!({"name": 42})))
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidFieldValue { field } if field == "name"));
    }

    #[test]
    fn concurrent_edits_keep_fields_absent_from_the_patch() {
        let mut sample = Sample::seed(uid(1), uid(2), uid(3));
        sample
            .apply_fields(&fields(json!({"name": "Original", "color": "Azul"})))
            .unwrap();

        // Patch posterior não menciona `color`; o valor vigente sobrevive.
        sample
            .apply_fields(&fields(json!({"name": "Renomeada"})))
            .unwrap();

        assert_eq!(sample.name, "Renomeada");
        assert_eq!(sample.color.as_deref(), Some("Azul"));
    }

    #[test]
    fn arrival_date_accepts_iso8601() {
        let mut sample = Sample::seed(uid(1), uid(2), uid(3));
        sample
            .apply_fields(&fields(json!({"arrivalDate": "2026-03-10T12:00:00Z"})))
            .unwrap();

        assert_eq!(
            sample.arrival_date.map(|d| d.to_rfc3339()),
            Some("2026-03-10T12:00:00+00:00".to_string())
        );
    }
}
