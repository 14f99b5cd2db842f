//! # depot-core
//!
//! Core crate for FileDepot. Contains configuration schemas, shared
//! pagination/sorting types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other FileDepot crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
