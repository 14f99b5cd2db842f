//! # depot-service
//!
//! Business logic for FileDepot. Services orchestrate the repository
//! traits, the content store, and the access gate; every operation takes
//! an explicit [`context::RequestContext`] — there is no implicit actor
//! anywhere in this crate.

pub mod audit;
pub mod context;
pub mod file;
pub mod locks;
pub mod share;
pub mod user;

pub use context::RequestContext;
