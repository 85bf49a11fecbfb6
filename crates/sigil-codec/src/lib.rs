//! Reversible identifier cipher for the Sigil URL shortener.
//!
//! Maps a sequential database row id to a fixed-length, non-sequential
//! looking token and back, with no persisted mapping table. The cipher is an
//! affine scramble modulo 62^6 followed by a fixed position permutation of
//! the base-62 rendering.

mod cipher;
pub mod error;
mod token;

pub use cipher::{decode, encode, ID_DOMAIN};
pub use error::CodecError;
pub use token::Token;
