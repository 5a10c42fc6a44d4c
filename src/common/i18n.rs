// src/common/i18n.rs

use std::collections::HashMap;

// Catálogo de mensagens por idioma. Campo técnico (chave) nunca chega ao
// cliente: o to_api_error troca a chave pela mensagem do idioma pedido.
const CATALOG: &[(&str, &str, &str)] = &[
    // (chave, en, pt)
    ("validation_failed", "One or more fields are invalid.", "Um ou mais campos são inválidos."),
    ("invalid_field_value", "Invalid value for one of the fields.", "Valor inválido para um dos campos."),
    ("storage_not_found_for_kind", "No storage found with this given uid.", "Nenhum storage encontrado com esse uid."),
    ("email_already_exists", "This e-mail is already in use.", "Este e-mail já está em uso."),
    ("phone_already_exists", "This phone number is already in use.", "Este telefone já está em uso."),
    ("membership_already_exists", "This user is already a member of the company.", "Este usuário já é membro da empresa."),
    ("request_already_resolved", "This request was already resolved.", "Este pedido já foi resolvido."),
    ("unique_violation", "A record with these values already exists.", "Já existe um registro com esses valores."),
    ("invalid_credentials", "Invalid e-mail or password.", "E-mail ou senha inválidos."),
    ("invalid_token", "Missing or invalid authentication token.", "Token de autenticação inválido ou ausente."),
    ("no_active_membership", "No active company selected.", "Nenhuma empresa ativa selecionada."),
    ("not_a_company_member", "You are not a member of this company.", "Você não é membro desta empresa."),
    ("role_not_allowed", "Your role cannot perform this operation.", "Seu cargo não pode realizar esta operação."),
    ("cannot_manage_role", "You can only manage roles below your own.", "Você só pode gerenciar cargos abaixo do seu."),
    ("user_not_found", "User not found.", "Usuário não encontrado."),
    ("company_not_found", "Company not found.", "Empresa não encontrada."),
    ("membership_not_found", "Member not found.", "Membro não encontrado."),
    ("storage_not_found", "Storage not found.", "Storage não encontrado."),
    ("sample_not_found", "Sample not found.", "Amostra não encontrada."),
    ("file_not_found", "File not found.", "Arquivo não encontrado."),
    ("request_not_found", "Request not found.", "Pedido não encontrado."),
    ("internal_error", "An unexpected error occurred.", "Ocorreu um erro inesperado."),
];

#[derive(Clone)]
pub struct I18nStore {
    messages: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl I18nStore {
    pub const SUPPORTED: [&'static str; 2] = ["en", "pt"];

    pub fn new() -> Self {
        let mut en = HashMap::new();
        let mut pt = HashMap::new();
        for (key, msg_en, msg_pt) in CATALOG {
            en.insert(*key, *msg_en);
            pt.insert(*key, *msg_pt);
        }
        let mut messages = HashMap::new();
        messages.insert("en", en);
        messages.insert("pt", pt);
        Self { messages }
    }

    /// Mensagem no idioma pedido; cai para inglês e, em último caso, para a
    /// própria chave (melhor uma chave crua do que um 500 no caminho de erro).
    pub fn message<'a>(&'a self, lang: &str, key: &'a str) -> &'a str {
        self.messages
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| self.messages.get("en").and_then(|catalog| catalog.get(key)))
            .copied()
            .unwrap_or(key)
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portuguese_messages_resolve() {
        let store = I18nStore::new();
        assert_eq!(
            store.message("pt", "invalid_credentials"),
            "E-mail ou senha inválidos."
        );
    }

    #[test]
    fn unsupported_language_falls_back_to_english() {
        let store = I18nStore::new();
        assert_eq!(
            store.message("fr", "invalid_credentials"),
            "Invalid e-mail or password."
        );
    }

    #[test]
    fn unknown_key_comes_back_verbatim() {
        let store = I18nStore::new();
        assert_eq!(store.message("en", "does_not_exist"), "does_not_exist");
    }

    #[test]
    fn every_catalog_entry_has_both_languages() {
        let store = I18nStore::new();
        for (key, _, _) in CATALOG {
            for lang in I18nStore::SUPPORTED {
                assert_ne!(store.message(lang, key), *key, "faltou {lang} para {key}");
            }
        }
    }
}
