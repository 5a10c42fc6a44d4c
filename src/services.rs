pub mod auth;
pub mod catalog;
pub mod file;
pub mod membership;
pub mod request;
pub mod sample;
pub mod storage;

pub use auth::AuthService;
pub use catalog::CatalogService;
pub use file::FileService;
pub use membership::MembershipService;
pub use request::RequestService;
pub use sample::SampleService;
pub use storage::StorageService;
