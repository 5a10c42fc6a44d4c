//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::{auth_guard, membership_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/companies", get(handlers::company::get_my_companies))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // As camadas valem só para as rotas já registradas: /switch entra depois
    // do membership_guard de propósito, porque trocar de empresa não exige
    // ter uma empresa ativa.
    let company_routes = Router::new()
        .route(
            "/members",
            get(handlers::company::list_members).post(handlers::company::add_member),
        )
        .route(
            "/members/{user_id}",
            patch(handlers::company::update_member_role),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            membership_guard,
        ))
        .route("/switch", post(handlers::company::switch_company))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let admin_routes = Router::new()
        .route("/members", post(handlers::company::admin_attach_member))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            membership_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let storage_routes = Router::new()
        .route(
            "/",
            post(handlers::storage::create_storage).get(handlers::storage::list_storages),
        )
        .route(
            "/{storage_id}",
            get(handlers::storage::get_storage)
                .patch(handlers::storage::update_storage)
                .delete(handlers::storage::delete_storage),
        )
        .route(
            "/{storage_id}/samples",
            post(handlers::sample::create_sample).get(handlers::sample::list_samples),
        )
        .route(
            "/{storage_id}/samples/{sample_id}",
            get(handlers::sample::get_sample)
                .patch(handlers::sample::update_sample)
                .delete(handlers::sample::delete_sample),
        )
        .route(
            "/{storage_id}/files",
            post(handlers::file::create_file).get(handlers::file::list_files),
        )
        .route(
            "/{storage_id}/files/{file_id}",
            get(handlers::file::get_file)
                .patch(handlers::file::update_file)
                .delete(handlers::file::delete_file),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            membership_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let request_routes = Router::new()
        .route("/", get(handlers::request::list_requests))
        .route(
            "/{request_id}",
            get(handlers::request::get_request).patch(handlers::request::resolve_request),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            membership_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let catalog_routes = Router::new()
        .route(
            "/buyers",
            post(handlers::catalog::create_buyer).get(handlers::catalog::list_buyers),
        )
        .route(
            "/notes",
            post(handlers::catalog::create_note).get(handlers::catalog::list_notes),
        )
        .route(
            "/projects",
            post(handlers::catalog::create_project).get(handlers::catalog::list_projects),
        )
        .route(
            "/images",
            post(handlers::catalog::create_image).get(handlers::catalog::list_images),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            membership_guard,
        ))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/companies", company_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/storages", storage_routes)
        .nest("/api/requests", request_routes)
        .nest("/api", catalog_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state);

    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
