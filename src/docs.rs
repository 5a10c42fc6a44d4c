// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::company::get_my_companies,

        // --- Companies ---
        handlers::company::switch_company,
        handlers::company::list_members,
        handlers::company::add_member,
        handlers::company::update_member_role,
        handlers::company::admin_attach_member,

        // --- Storages ---
        handlers::storage::create_storage,
        handlers::storage::list_storages,
        handlers::storage::get_storage,
        handlers::storage::update_storage,
        handlers::storage::delete_storage,

        // --- Samples ---
        handlers::sample::create_sample,
        handlers::sample::list_samples,
        handlers::sample::get_sample,
        handlers::sample::update_sample,
        handlers::sample::delete_sample,

        // --- Files ---
        handlers::file::create_file,
        handlers::file::list_files,
        handlers::file::get_file,
        handlers::file::update_file,
        handlers::file::delete_file,

        // --- Requests ---
        handlers::request::list_requests,
        handlers::request::get_request,
        handlers::request::resolve_request,

        // --- Catalog ---
        handlers::catalog::create_buyer,
        handlers::catalog::list_buyers,
        handlers::catalog::create_note,
        handlers::catalog::list_notes,
        handlers::catalog::create_project,
        handlers::catalog::list_projects,
        handlers::catalog::create_image,
        handlers::catalog::list_images,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Companies ---
            models::company::CompanyRole,
            models::company::EntityStatus,
            models::company::Company,
            models::company::Membership,
            models::company::CompanyMembership,
            models::company::MemberRow,
            models::company::SwitchCompanyPayload,
            models::company::AddMemberPayload,
            models::company::UpdateMemberPayload,
            models::company::AdminAttachMemberPayload,

            // --- Storages ---
            models::storage::StorageKind,
            models::storage::Storage,
            models::storage::CreateStoragePayload,
            models::storage::UpdateStoragePayload,

            // --- Samples ---
            models::sample::WeightUnit,
            models::sample::SizeUnit,
            models::sample::SampleKind,
            models::sample::Sample,
            models::sample::SampleDetail,
            models::sample::CreateSamplePayload,
            models::sample::UpdateSamplePayload,

            // --- Files ---
            models::file::File,
            models::file::FileDetail,
            models::file::CreateFilePayload,
            models::file::UpdateFilePayload,

            // --- Requests ---
            models::request::RequestedFrom,
            models::request::RequestedAction,
            models::request::RequestStatus,
            models::request::RequestedData,
            models::request::ModifyRequest,
            models::request::ResolveRequestPayload,
            models::request::RequestVerdict,

            // --- Catalog ---
            models::catalog::Buyer,
            models::catalog::CreateBuyerPayload,
            models::catalog::Note,
            models::catalog::CreateNotePayload,
            models::catalog::Project,
            models::catalog::CreateProjectPayload,
            models::catalog::Image,
            models::catalog::CreateImagePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Registro e autenticação"),
        (name = "Users", description = "Dados do usuário e suas empresas"),
        (name = "Companies", description = "Empresa ativa e gestão de membros"),
        (name = "Storages", description = "Locais físicos (SPACE e DRAWER)"),
        (name = "Samples", description = "Amostras de vestuário"),
        (name = "Files", description = "Arquivos de cabide"),
        (name = "Requests", description = "Pedidos de modificação e moderação"),
        (name = "Catalog", description = "Compradores, notas, projetos e imagens")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
