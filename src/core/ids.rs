//! Stable identifiers and content hashing.
//!
//! - FNV-1a 64-bit for deterministic ids (dependency-free, stable across
//!   runs and machines);
//! - Target ids: 12 lowercase hex chars over `page|name|strategy|value`;
//! - Document ids: 12 hex chars over a `kind::name` key;
//! - Step/assertion ordinals: `STEP_01`, zero-padded to two digits, growing
//!   to three past 99.

use crate::model::records::Strategy;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// FNV-1a 64-bit over raw bytes, as a full 16-hex lowercase string.
#[inline]
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash ^= *b as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// 12-hex-char lowercase truncation of the 64-bit hash of `key`.
#[inline]
pub fn short_hash(key: &str) -> String {
    let hex = format!("{:016x}", fnv1a_64(key.as_bytes()));
    hex[..12].to_string()
}

/// Deterministic target id over the full identity tuple. Targets that share
/// a name but differ in page, strategy, or locator value get distinct ids.
pub fn target_id(page: &str, name: &str, strategy: Strategy, locator_value: &str) -> String {
    let key = format!("{page}|{name}|{}|{locator_value}", strategy.as_str());
    short_hash(&key)
}

/// Deterministic document id from a namespaced key (`test::LoginTest.login`).
pub fn document_id(kind: &str, name: &str) -> String {
    short_hash(&format!("{kind}::{name}"))
}

/// Ordinal step id: `STEP_01` ... `STEP_99`, `STEP_100` ... (1-based).
pub fn step_id(ordinal: usize) -> String {
    format!("STEP_{ordinal:02}")
}

/// Ordinal assertion id, same scheme as [`step_id`].
pub fn assert_id(ordinal: usize) -> String {
    format!("ASSERT_{ordinal:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hash_is_stable_and_12_chars() {
        let a = short_hash("LoginPage|emailInput|css|#email");
        let b = short_hash("LoginPage|emailInput|css|#email");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn target_id_depends_on_every_tuple_component() {
        let base = target_id("LoginPage", "emailInput", Strategy::Css, "#email");
        assert_ne!(base, target_id("HomePage", "emailInput", Strategy::Css, "#email"));
        assert_ne!(base, target_id("LoginPage", "email", Strategy::Css, "#email"));
        assert_ne!(base, target_id("LoginPage", "emailInput", Strategy::Xpath, "#email"));
        assert_ne!(base, target_id("LoginPage", "emailInput", Strategy::Css, "#mail"));
    }

    #[test]
    fn step_ids_zero_pad_then_grow() {
        assert_eq!(step_id(1), "STEP_01");
        assert_eq!(step_id(99), "STEP_99");
        assert_eq!(step_id(100), "STEP_100");
        assert_eq!(assert_id(7), "ASSERT_07");
    }
}
