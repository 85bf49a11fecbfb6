use crate::cipher;
use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

/// A six-character public token produced by [`encode`][crate::encode].
///
/// Tokens are never persisted; they are recomputed from the stored row id on
/// demand, so a token can never drift from the current encoding rule.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token(SmolStr);

impl Token {
    /// The fixed token length, in characters.
    pub const LEN: usize = cipher::TOKEN_LEN;

    /// Creates a `Token` from an untrusted string, validating that it is
    /// exactly six characters from the token alphabet.
    ///
    /// This checks shape only; whether the token maps back to a real
    /// identifier is decided by [`decode`][crate::decode].
    pub fn new(token: impl AsRef<str>) -> Result<Self> {
        let token = token.as_ref();
        cipher::token_bytes(token)?;
        Ok(Self(SmolStr::new(token)))
    }

    /// Creates a `Token` from bytes already known to be alphabet characters.
    ///
    /// Only `encode` constructs tokens this way.
    pub(crate) fn from_raw(raw: [u8; cipher::TOKEN_LEN]) -> Self {
        // The alphabet is ASCII, so every byte is a one-byte char.
        Self(raw.iter().map(|&b| char::from(b)).collect())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Composes the full short link for this token.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/short/{}", base_url.trim_end_matches('/'), self.0)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Token").field(&self.0).finish()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Token {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Serialize for Token {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = SmolStr::deserialize(deserializer)?;
        Token::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_tokens() {
        assert!(Token::new("3700D0").is_ok());
        assert!(Token::new("zzzzzz").is_ok());
        assert!(Token::new("000000").is_ok());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(Token::new("").is_err());
        assert!(Token::new("abc").is_err());
        assert!(Token::new("abcdefg").is_err());
    }

    #[test]
    fn rejects_non_alphabet_characters() {
        assert!(Token::new("abc!@#").is_err());
        assert!(Token::new("ab cde").is_err());
        assert!(Token::new("abcde\u{e9}").is_err());
    }

    #[test]
    fn to_url_trims_trailing_slash() {
        let token = Token::new("3700D0").unwrap();
        assert_eq!(token.to_url("https://sgl.ink"), "https://sgl.ink/short/3700D0");
        assert_eq!(token.to_url("https://sgl.ink/"), "https://sgl.ink/short/3700D0");
    }

    #[test]
    fn deserialize_validates_shape() {
        let token: Token = serde_json::from_str("\"3700D0\"").unwrap();
        assert_eq!(token.as_str(), "3700D0");

        assert!(serde_json::from_str::<Token>("\"nope\"").is_err());
        assert!(serde_json::from_str::<Token>("\"abc!@#\"").is_err());
    }
}
