//! URL shortener service implementation.
//!
//! This crate wires the reversible id codec to a repository: shortening
//! stores the long URL and encodes the assigned row id, resolution decodes
//! a token back to a row id and looks it up.

pub mod error;
pub mod service;
pub mod shortener;

pub use error::ShortenerError;
pub use service::ShortenerService;
pub use shortener::{ShortenParams, Shortened, Shortener};
