pub mod auth;
pub mod i18n;
pub mod rbac;

pub use auth::{auth_guard, membership_guard, ActiveMembership, AuthenticatedUser};
pub use i18n::Locale;
pub use rbac::RequireRole;
