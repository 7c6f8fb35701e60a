mod accounts;
mod audit;
mod cache;
mod menu;
mod permissions;
mod roles;

pub use accounts::{AccountRecord, AccountRepository, PasswordVerifier};
pub use audit::{AuditEvent, AuditSink};
pub use cache::ResolvedMenuCache;
pub use menu::MenuRegistryRepository;
pub use permissions::PermissionStore;
pub use roles::{RoleDefinition, RoleRepository};
