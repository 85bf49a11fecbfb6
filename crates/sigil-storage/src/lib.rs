//! Storage backends for the Sigil URL shortener.
//!
//! Both backends implement the [`Repository`][sigil_core::Repository]
//! contract: sequential id assignment starting at 1 and a unique
//! `long_url` column, so repeated shortens of the same URL reuse the
//! original row.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRepository;
pub use sqlite::SqliteRepository;
