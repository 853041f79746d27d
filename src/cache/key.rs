//! Cache Key Module
//!
//! Derives stable cache keys from the request-defining fields of a
//! simplification request. External callers recompute keys independently,
//! so the format is a wire contract:
//! `cache:{model_version}:{glossary_version}:{mode}:{16-hex input fingerprint}`.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the input digest.
const FINGERPRINT_HEX_LEN: usize = 16;

/// Generates the cache key for a simplification request.
///
/// Deterministic: identical inputs always yield the identical key. The input
/// text is folded into a fixed-width fingerprint so key length is bounded
/// regardless of input size.
pub fn generate_key(
    model_version: &str,
    glossary_version: &str,
    mode: &str,
    input_text: &str,
) -> String {
    format!(
        "cache:{}:{}:{}:{}",
        model_version,
        glossary_version,
        mode,
        generate_input_hash(input_text)
    )
}

/// Generates the bare input fingerprint: the first 16 hex characters of the
/// SHA-256 digest of the UTF-8 input bytes.
pub fn generate_input_hash(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    hex::encode(&digest[..FINGERPRINT_HEX_LEN / 2])
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        let key = generate_key("mt5-v1.0", "default", "easy", "test input");
        assert!(key.starts_with("cache:mt5-v1.0:default:easy:"));

        let fingerprint = key.rsplit(':').next().unwrap();
        assert_eq!(fingerprint.len(), 16);
        assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_key_is_deterministic() {
        let a = generate_key("mt5-v1.0", "default", "easy", "Guten Tag");
        let b = generate_key("mt5-v1.0", "default", "easy", "Guten Tag");
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_inputs_yield_distinct_keys() {
        let a = generate_key("mt5-v1.0", "default", "easy", "Guten Tag");
        let b = generate_key("mt5-v1.0", "default", "easy", "Guten Tag!");
        assert_ne!(a, b);
    }

    #[test]
    fn test_distinct_request_fields_yield_distinct_keys() {
        let base = generate_key("mt5-v1.0", "default", "easy", "Guten Tag");
        assert_ne!(base, generate_key("mt5-v2.0", "default", "easy", "Guten Tag"));
        assert_ne!(base, generate_key("mt5-v1.0", "medical", "easy", "Guten Tag"));
        assert_ne!(base, generate_key("mt5-v1.0", "default", "light", "Guten Tag"));
    }

    #[test]
    fn test_input_hash_known_answer() {
        // SHA-256("") = e3b0c44298fc1c14...
        assert_eq!(generate_input_hash(""), "e3b0c44298fc1c14");
        // SHA-256("hello") = 2cf24dba5fb0a30e...
        assert_eq!(generate_input_hash("hello"), "2cf24dba5fb0a30e");
    }

    #[test]
    fn test_input_hash_length() {
        assert_eq!(generate_input_hash("some longer input text").len(), 16);
        assert_eq!(generate_input_hash(&"x".repeat(100_000)).len(), 16);
    }
}
