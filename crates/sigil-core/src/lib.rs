//! Core types and traits for the Sigil URL shortener.
//!
//! This crate provides the repository contract shared by the storage
//! backends and the shortener service.

pub mod error;
pub mod repository;

pub use error::StorageError;
pub use repository::{Repository, UrlRecord};
