//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_authorization_store;
mod in_memory_resolved_menu_cache;
mod postgres_account_repository;
mod postgres_menu_registry_repository;
mod postgres_permission_store;
mod postgres_role_repository;
#[cfg(test)]
mod postgres_test_support;
mod tracing_audit_sink;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_authorization_store::InMemoryAuthorizationStore;
pub use in_memory_resolved_menu_cache::InMemoryResolvedMenuCache;
pub use postgres_account_repository::PostgresAccountRepository;
pub use postgres_menu_registry_repository::PostgresMenuRegistryRepository;
pub use postgres_permission_store::PostgresPermissionStore;
pub use postgres_role_repository::PostgresRoleRepository;
pub use tracing_audit_sink::TracingAuditSink;
