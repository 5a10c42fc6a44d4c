// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    common::i18n::I18nStore,
    db::{
        CatalogRepository, CompanyRepository, FileRepository, RequestRepository, SampleRepository,
        StorageRepository, UserRepository,
    },
    services::{
        AuthService, CatalogService, FileService, MembershipService, RequestService, SampleService,
        StorageService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub i18n_store: I18nStore,
    // O membership_guard resolve a empresa ativa direto no repositório.
    pub company_repo: CompanyRepository,
    pub auth_service: AuthService,
    pub membership_service: MembershipService,
    pub storage_service: StorageService,
    pub sample_service: SampleService,
    pub file_service: FileService,
    pub request_service: RequestService,
    pub catalog_service: CatalogService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let company_repo = CompanyRepository::new(db_pool.clone());
        let storage_repo = StorageRepository::new(db_pool.clone());
        let sample_repo = SampleRepository::new(db_pool.clone());
        let file_repo = FileRepository::new(db_pool.clone());
        let request_repo = RequestRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            company_repo.clone(),
            jwt_secret,
            db_pool.clone(),
        );
        let membership_service =
            MembershipService::new(user_repo.clone(), company_repo.clone(), db_pool.clone());
        let storage_service = StorageService::new(
            storage_repo.clone(),
            company_repo.clone(),
            db_pool.clone(),
        );
        let sample_service = SampleService::new(
            sample_repo.clone(),
            storage_repo.clone(),
            request_repo.clone(),
            company_repo.clone(),
            db_pool.clone(),
        );
        let file_service = FileService::new(
            file_repo.clone(),
            storage_repo.clone(),
            request_repo.clone(),
            company_repo.clone(),
            db_pool.clone(),
        );
        let request_service = RequestService::new(
            request_repo,
            sample_repo,
            file_repo,
            storage_repo,
            company_repo.clone(),
            db_pool.clone(),
        );
        let catalog_service =
            CatalogService::new(catalog_repo, company_repo.clone(), db_pool.clone());

        Ok(Self {
            db_pool,
            i18n_store: I18nStore::new(),
            company_repo,
            auth_service,
            membership_service,
            storage_service,
            sample_service,
            file_service,
            request_service,
            catalog_service,
        })
    }
}
