pub mod catalog_repo;
pub mod company_repo;
pub mod file_repo;
pub mod request_repo;
pub mod sample_repo;
pub mod storage_repo;
pub mod user_repo;

pub use catalog_repo::CatalogRepository;
pub use company_repo::CompanyRepository;
pub use file_repo::FileRepository;
pub use request_repo::RequestRepository;
pub use sample_repo::SampleRepository;
pub use storage_repo::StorageRepository;
pub use user_repo::UserRepository;
