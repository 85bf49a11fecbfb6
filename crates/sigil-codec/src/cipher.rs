use crate::error::{CodecError, Result};
use crate::token::Token;

/// Token alphabet, in fixed order. Index 0 is `'0'`.
const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

const RADIX: u64 = ALPHABET.len() as u64;

/// Token length in characters.
pub(crate) const TOKEN_LEN: usize = 6;

/// Cipher modulus, `62^6 = 56_800_235_584`. Every value below it renders as
/// exactly six base-62 digits.
const MODULUS: u64 = RADIX.pow(TOKEN_LEN as u32);

/// Affine multiplier. `731 = 17 * 43` shares no factor with `62 = 2 * 31`,
/// so it is invertible modulo `62^6`.
const MULTIPLIER: u64 = 731;

/// Affine offset.
const OFFSET: u64 = 12345;

/// Upper bound (exclusive) of the identifier domain.
pub const ID_DOMAIN: u64 = 1_000_000;

/// Output position `i` takes its character from input position `PERM[i]`.
const PERM: [usize; TOKEN_LEN] = [3, 5, 0, 1, 4, 2];

/// Two-sided inverse of [`PERM`]: `INVERSE_PERM[PERM[i]] == i`.
const INVERSE_PERM: [usize; TOKEN_LEN] = [2, 3, 5, 0, 4, 1];

/// Alphabet byte -> digit value, -1 for bytes outside the alphabet.
const DIGIT_VALUES: [i8; 256] = {
    let mut table = [-1i8; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as i8;
        i += 1;
    }
    table
};

/// Encodes a row identifier as its public token.
///
/// The identifier is scrambled with an affine transform modulo `62^6`,
/// rendered as six base-62 digits, and position-permuted. Consecutive
/// identifiers therefore produce visually unrelated tokens, while
/// [`decode`] recovers the identifier exactly.
///
/// Fails with [`CodecError::IdOutOfRange`] for identifiers at or past
/// [`ID_DOMAIN`]; out-of-range input is never clamped.
pub fn encode(id: u64) -> Result<Token> {
    if id >= ID_DOMAIN {
        return Err(CodecError::IdOutOfRange { id });
    }

    let scrambled = (MULTIPLIER * id + OFFSET) % MODULUS;
    let digits = base62_fixed(scrambled);

    let mut raw = [0u8; TOKEN_LEN];
    for (i, slot) in raw.iter_mut().enumerate() {
        *slot = digits[PERM[i]];
    }
    Ok(Token::from_raw(raw))
}

/// Decodes a public token back to its row identifier.
///
/// Fails with [`CodecError::MalformedToken`] if the input is not exactly six
/// alphabet characters, and with [`CodecError::UnknownToken`] if the
/// recovered identifier falls outside [`ID_DOMAIN`]. The decoded space is
/// far larger than the identifier domain, so the range check catches most
/// forged or corrupted tokens.
pub fn decode(token: &str) -> Result<u64> {
    let raw = token_bytes(token)?;

    let mut digits = [0u8; TOKEN_LEN];
    for (j, slot) in digits.iter_mut().enumerate() {
        *slot = raw[INVERSE_PERM[j]];
    }
    let scrambled = base62_value(&digits);

    // (scrambled - OFFSET) can wrap below zero; reduce into [0, MODULUS)
    // before multiplying. The multiply itself needs 128 bits: both factors
    // are below MODULUS, and their product exceeds u64.
    let inverse = mod_inverse(MULTIPLIER, MODULUS);
    let shifted = (scrambled + MODULUS - OFFSET) % MODULUS;
    let id = (u128::from(inverse) * u128::from(shifted) % u128::from(MODULUS)) as u64;

    if id >= ID_DOMAIN {
        return Err(CodecError::UnknownToken);
    }
    Ok(id)
}

/// Checks that `token` is exactly six alphabet bytes and returns them.
pub(crate) fn token_bytes(token: &str) -> Result<[u8; TOKEN_LEN]> {
    let bytes = token.as_bytes();
    let Ok(raw) = <[u8; TOKEN_LEN]>::try_from(bytes) else {
        return Err(CodecError::MalformedToken(token.to_owned()));
    };
    if raw.iter().any(|&b| DIGIT_VALUES[b as usize] < 0) {
        return Err(CodecError::MalformedToken(token.to_owned()));
    }
    Ok(raw)
}

/// Renders `value` as exactly six base-62 digits, left-padded with the
/// alphabet's zero symbol.
fn base62_fixed(mut value: u64) -> [u8; TOKEN_LEN] {
    // A seventh digit would silently corrupt the bijection.
    debug_assert!(value < MODULUS, "value {value} needs more than six digits");

    let mut digits = [ALPHABET[0]; TOKEN_LEN];
    let mut idx = TOKEN_LEN;
    while value > 0 {
        idx -= 1;
        digits[idx] = ALPHABET[(value % RADIX) as usize];
        value /= RADIX;
    }
    digits
}

/// Parses six alphabet bytes as a base-62 integer.
fn base62_value(digits: &[u8; TOKEN_LEN]) -> u64 {
    digits.iter().fold(0u64, |acc, &b| {
        let digit = DIGIT_VALUES[b as usize];
        debug_assert!(digit >= 0, "digit bytes are validated before parsing");
        acc * RADIX + digit as u64
    })
}

/// Multiplicative inverse of `a` modulo `m`, via the extended Euclidean
/// algorithm, normalized into `[0, m)`.
///
/// The caller must pass coprime `a` and `m`; for `m == 1` the inverse is 0.
fn mod_inverse(a: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }

    let modulus = i128::from(m);
    let (mut a, mut m) = (i128::from(a), modulus);
    let (mut x0, mut x1) = (0i128, 1i128);
    while a > 1 {
        let quotient = a / m;
        let remainder = a % m;
        a = m;
        m = remainder;

        let next = x1 - quotient * x0;
        x1 = x0;
        x0 = next;
    }

    if x1 < 0 {
        x1 += modulus;
    }
    x1 as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverse_perm_inverts_perm() {
        for (i, &p) in PERM.iter().enumerate() {
            assert_eq!(INVERSE_PERM[p], i);
        }
        for (j, &p) in INVERSE_PERM.iter().enumerate() {
            assert_eq!(PERM[p], j);
        }
    }

    #[test]
    fn permuting_then_unpermuting_restores_any_sequence() {
        // Purely combinatorial; independent of the numeric cipher.
        let input = [b'a', b'b', b'c', b'd', b'e', b'f'];

        let mut permuted = [0u8; TOKEN_LEN];
        for (i, slot) in permuted.iter_mut().enumerate() {
            *slot = input[PERM[i]];
        }

        let mut restored = [0u8; TOKEN_LEN];
        for (j, slot) in restored.iter_mut().enumerate() {
            *slot = permuted[INVERSE_PERM[j]];
        }

        assert_eq!(restored, input);
    }

    #[test]
    fn golden_vectors() {
        assert_eq!(encode(0).unwrap().as_str(), "3700D0");
        assert_eq!(encode(1).unwrap().as_str(), "3u00O0");
        assert_eq!(encode(2).unwrap().as_str(), "3h00a0");
        assert_eq!(encode(42).unwrap().as_str(), "BJ00C0");
        assert_eq!(encode(999_999).unwrap().as_str(), "Fu0nVT");
    }

    #[test]
    fn golden_vectors_decode_back() {
        assert_eq!(decode("3700D0").unwrap(), 0);
        assert_eq!(decode("3u00O0").unwrap(), 1);
        assert_eq!(decode("3h00a0").unwrap(), 2);
        assert_eq!(decode("BJ00C0").unwrap(), 42);
        assert_eq!(decode("Fu0nVT").unwrap(), 999_999);
    }

    #[test]
    fn round_trip_over_the_whole_domain() {
        for id in 0..ID_DOMAIN {
            let token = encode(id).unwrap();
            assert_eq!(decode(token.as_str()).unwrap(), id, "token {token}");
        }
    }

    #[test]
    fn tokens_are_always_six_characters() {
        for id in [0, 1, 61, 62, 3843, 999_999] {
            assert_eq!(encode(id).unwrap().as_str().len(), TOKEN_LEN);
        }
    }

    #[test]
    fn distinct_ids_produce_distinct_tokens() {
        let mut seen = std::collections::HashSet::new();
        for id in 0..20_000 {
            assert!(seen.insert(encode(id).unwrap()), "collision at id {id}");
        }
    }

    #[test]
    fn encode_rejects_out_of_domain_ids() {
        assert_eq!(
            encode(ID_DOMAIN).unwrap_err(),
            CodecError::IdOutOfRange { id: ID_DOMAIN }
        );
        assert!(encode(u64::MAX).is_err());
        assert!(encode(ID_DOMAIN - 1).is_ok());
    }

    #[test]
    fn decode_rejects_malformed_tokens() {
        for bad in ["", "abc", "abcdefg", "abc!@#", "abcd\u{e9}"] {
            assert!(
                matches!(decode(bad), Err(CodecError::MalformedToken(_))),
                "expected malformed: {bad:?}"
            );
        }
    }

    #[test]
    fn decode_rejects_tokens_outside_the_identifier_domain() {
        // Well-formed tokens whose affine preimage is 1_000_000 and
        // 55_000_000: syntactically valid, but no encode call can emit them.
        assert_eq!(decode("Fh0nhT").unwrap_err(), CodecError::UnknownToken);
        assert_eq!(decode("83hsLu").unwrap_err(), CodecError::UnknownToken);
    }

    #[test]
    fn mod_inverse_of_the_cipher_multiplier() {
        let inverse = mod_inverse(MULTIPLIER, MODULUS);
        assert_eq!(inverse, 39_783_475_539);
        assert_eq!(
            u128::from(MULTIPLIER) * u128::from(inverse) % u128::from(MODULUS),
            1
        );
    }

    #[test]
    fn mod_inverse_small_cases() {
        assert_eq!(mod_inverse(3, 7), 5);
        assert_eq!(mod_inverse(7, 13), 2);
        assert_eq!(mod_inverse(5, 1), 0);
    }

    #[test]
    fn zero_renders_as_all_zero_digits() {
        assert_eq!(base62_fixed(0), *b"000000");
        assert_eq!(base62_value(b"000000"), 0);
    }

    #[test]
    fn base62_round_trips_boundary_values() {
        for value in [0, 1, 61, 62, MODULUS - 1] {
            assert_eq!(base62_value(&base62_fixed(value)), value);
        }
        assert_eq!(base62_fixed(MODULUS - 1), *b"zzzzzz");
    }
}
