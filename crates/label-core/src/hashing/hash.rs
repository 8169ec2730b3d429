//! Helpers de hash (blake3, hex).

use blake3::Hasher;
use serde_json::Value;

use super::to_canonical_json;

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Hash estable de un valor JSON (vía su forma canónica).
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hash_ignores_key_order() {
        assert_eq!(hash_value(&json!({"x": 1, "y": 2})), hash_value(&json!({"y": 2, "x": 1})));
        assert_ne!(hash_value(&json!({"x": 1})), hash_value(&json!({"x": 2})));
        assert_eq!(hash_str("").len(), 64);
    }
}
