pub mod auth;
pub mod catalog;
pub mod company;
pub mod file;
pub mod request;
pub mod sample;
pub mod storage;

pub use company::{CompanyRole, EntityStatus};
