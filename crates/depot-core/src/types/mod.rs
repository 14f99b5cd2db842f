//! Shared request/response types used across crates.

pub mod pagination;
pub mod sorting;

pub use pagination::{PageRequest, PageResponse};
pub use sorting::FileSortKey;
