//! # depot-auth
//!
//! Authentication and authorization for FileDepot: Argon2id password
//! hashing, JWT access tokens, and the role/ownership access control gate
//! that fronts every file operation.

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
pub use rbac::{AccessGate, Action, RbacPolicies, Resource};
