pub mod authz;
pub mod error;
pub mod i18n;

pub use error::{ApiError, AppError};
pub use i18n::I18nStore;
