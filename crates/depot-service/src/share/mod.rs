//! Public share link service.

pub mod service;

pub use service::ShareService;
