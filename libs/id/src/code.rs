//! Salted fixed-length codes for resource IDs.
//!
//! A code is a reversible scramble of a row counter: the counter is
//! multiplied by a constant coprime to the code space, offset by the salt,
//! written in the charset's base, and each digit is shifted by a
//! salt-derived offset chained to the previous output digit. Consecutive
//! counters therefore produce unrelated-looking codes, and the mapping is a
//! bijection on `[0, charset.len() ^ length)`.

use crate::IdError;

/// Charset used when none is configured.
pub const DEFAULT_CHARSET: &str = "abcdefghijklmnopqrstuvwxyz1234567890";

/// Code length used when none is configured.
pub const DEFAULT_CODE_LENGTH: u32 = 6;

/// Starting point for the multiplier search; bumped until coprime to the base.
const MULTIPLIER_SEED: u64 = 1_580_030_173;

/// Encodes counters as salted fixed-length codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEncoder {
    charset: Vec<char>,
    length: u32,
    salt: u64,
    space: u64,
    multiplier: u64,
    inverse: u64,
}

impl CodeEncoder {
    /// Builds an encoder over [`DEFAULT_CHARSET`] with [`DEFAULT_CODE_LENGTH`].
    #[must_use]
    pub fn with_salt(salt: u64) -> Self {
        let charset: Vec<char> = DEFAULT_CHARSET.chars().collect();
        let space = (charset.len() as u64).pow(DEFAULT_CODE_LENGTH);
        Self::from_parts(charset, DEFAULT_CODE_LENGTH, space, salt)
    }

    /// Builds an encoder with a custom charset and length.
    ///
    /// The charset needs at least two distinct characters, and
    /// `charset.len() ^ length` must fit in a `u64`.
    pub fn new(charset: &str, length: u32, salt: u64) -> Result<Self, IdError> {
        let chars: Vec<char> = charset.chars().collect();
        if chars.len() < 2 {
            return Err(IdError::invalid_config(
                "code charset needs at least two characters",
            ));
        }
        let mut sorted = chars.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != chars.len() {
            return Err(IdError::invalid_config(
                "code charset contains duplicate characters",
            ));
        }
        if length == 0 {
            return Err(IdError::invalid_config("code length must be positive"));
        }

        let base = chars.len() as u64;
        let space = base.checked_pow(length).ok_or_else(|| {
            IdError::invalid_config(format!(
                "code space {base}^{length} does not fit in 64 bits"
            ))
        })?;
        Ok(Self::from_parts(chars, length, space, salt))
    }

    /// `charset` must hold at least two distinct chars and `space` must be
    /// `charset.len() ^ length`.
    fn from_parts(charset: Vec<char>, length: u32, space: u64, salt: u64) -> Self {
        let multiplier = coprime_multiplier(charset.len() as u64, space);
        Self {
            charset,
            length,
            salt: salt % space,
            space,
            multiplier,
            inverse: mod_inverse(multiplier, space),
        }
    }

    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Number of distinct codes; counters wrap modulo this value.
    #[must_use]
    pub const fn space(&self) -> u64 {
        self.space
    }

    /// Encodes `counter` (modulo [`space`](Self::space)).
    #[must_use]
    pub fn encode(&self, counter: u64) -> String {
        let base = self.base();
        let n = counter % self.space;
        let mut x = add_mod(mul_mod(n, self.multiplier, self.space), self.salt, self.space);

        let len = self.length as usize;
        let mut digits = vec![0u64; len];
        for slot in digits.iter_mut().rev() {
            *slot = x % base;
            x /= base;
        }

        let mut code = String::with_capacity(len);
        let mut prev = 0u64;
        for (i, digit) in digits.into_iter().enumerate() {
            let out = (digit + self.offset(i) + prev) % base;
            code.push(self.charset[out as usize]);
            prev = out;
        }
        code
    }

    /// Recovers the counter (modulo [`space`](Self::space)) from a code.
    pub fn decode(&self, code: &str) -> Result<u64, IdError> {
        let base = self.base();
        let chars: Vec<char> = code.chars().collect();
        if chars.len() != self.length as usize {
            return Err(IdError::invalid_code(format!(
                "expected {} characters, got {}",
                self.length,
                chars.len()
            )));
        }

        let mut x = 0u64;
        let mut prev = 0u64;
        for (i, c) in chars.into_iter().enumerate() {
            let out = self
                .charset
                .iter()
                .position(|&candidate| candidate == c)
                .ok_or_else(|| IdError::invalid_code(format!("unexpected character '{c}'")))?
                as u64;
            let shift = (self.offset(i) + prev) % base;
            let digit = (out + base - shift) % base;
            x = x * base + digit;
            prev = out;
        }

        let unsalted = add_mod(x, self.space - self.salt, self.space);
        Ok(mul_mod(unsalted, self.inverse, self.space))
    }

    fn base(&self) -> u64 {
        self.charset.len() as u64
    }

    fn offset(&self, position: usize) -> u64 {
        let mixed = self
            .salt
            .wrapping_add(position as u64)
            .wrapping_mul(0x9E37_79B9_7F4A_7C15);
        (mixed >> 32) % self.base()
    }
}

impl Default for CodeEncoder {
    fn default() -> Self {
        Self::with_salt(0)
    }
}

fn coprime_multiplier(base: u64, space: u64) -> u64 {
    let mut m = MULTIPLIER_SEED % space;
    while gcd(m, base) != 1 {
        m = (m + 1) % space;
    }
    m
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn add_mod(a: u64, b: u64, m: u64) -> u64 {
    ((u128::from(a) + u128::from(b)) % u128::from(m)) as u64
}

fn mul_mod(a: u64, b: u64, m: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(m)) as u64
}

/// Inverse of `a` modulo `m`; `a` must be coprime to `m`.
fn mod_inverse(a: u64, m: u64) -> u64 {
    let (mut old_r, mut r) = (i128::from(a), i128::from(m));
    let (mut old_s, mut s) = (1i128, 0i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    old_s.rem_euclid(i128::from(m)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_shape() {
        let encoder = CodeEncoder::default();
        let code = encoder.encode(42);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| DEFAULT_CHARSET.contains(c)));
    }

    #[test]
    fn test_sequential_counters_distinct() {
        let encoder = CodeEncoder::with_salt(99);
        let codes: HashSet<String> = (0..10_000).map(|n| encoder.encode(n)).collect();
        assert_eq!(codes.len(), 10_000);
    }

    #[test]
    fn test_salt_changes_code() {
        let a = CodeEncoder::with_salt(1);
        let b = CodeEncoder::with_salt(2);
        assert_ne!(a.encode(1000), b.encode(1000));
    }

    #[test]
    fn test_counter_wraps_modulo_space() {
        let encoder = CodeEncoder::with_salt(5);
        assert_eq!(encoder.encode(7), encoder.encode(7 + encoder.space()));
    }

    #[test]
    fn test_exhaustive_small_space_is_bijection() {
        let encoder = CodeEncoder::new("abc", 4, 11).unwrap();
        assert_eq!(encoder.space(), 81);
        let codes: HashSet<String> = (0..81).map(|n| encoder.encode(n)).collect();
        assert_eq!(codes.len(), 81);
        for n in 0..81 {
            assert_eq!(encoder.decode(&encoder.encode(n)).unwrap(), n);
        }
    }

    #[test]
    fn test_decode_rejects_bad_codes() {
        let encoder = CodeEncoder::default();
        assert!(matches!(
            encoder.decode("abc"),
            Err(IdError::InvalidCode { .. })
        ));
        assert!(matches!(
            encoder.decode("ABCDEF"),
            Err(IdError::InvalidCode { .. })
        ));
    }

    #[test]
    fn test_with_salt_matches_new_with_defaults() {
        for salt in [0, 1, 99, u64::MAX] {
            let built = CodeEncoder::new(DEFAULT_CHARSET, DEFAULT_CODE_LENGTH, salt).unwrap();
            assert_eq!(CodeEncoder::with_salt(salt), built);
        }
    }

    #[test]
    fn test_invalid_charsets() {
        assert!(CodeEncoder::new("a", 6, 0).is_err());
        assert!(CodeEncoder::new("aab", 6, 0).is_err());
        assert!(CodeEncoder::new("ab", 0, 0).is_err());
        assert!(CodeEncoder::new(DEFAULT_CHARSET, 13, 0).is_err());
        assert!(CodeEncoder::new(DEFAULT_CHARSET, 12, 0).is_ok());
    }

    proptest! {
        #[test]
        fn prop_decode_inverts_encode(counter in any::<u64>(), salt in any::<u64>()) {
            let encoder = CodeEncoder::with_salt(salt);
            let code = encoder.encode(counter);
            prop_assert_eq!(encoder.decode(&code).unwrap(), counter % encoder.space());
        }
    }
}
