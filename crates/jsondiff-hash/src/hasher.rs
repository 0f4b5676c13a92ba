use jsondiff_types::{exact_integer, Kind};
use serde_json::{Map, Number, Value};

/// A 64-bit content digest of a JSON value.
///
/// Digests are comparable only within one process run; the encoding is not a
/// stable wire format.
pub type Digest = u64;

const NULL_MARKER: u8 = 0xff;

/// Domain-separated BLAKE3 value hasher.
///
/// Every digest starts from fresh BLAKE3 state seeded with the domain tag, so
/// no state leaks from one call to the next. Object members are fed in sorted
/// key order, which makes the digest independent of key insertion order.
/// Array elements are fed in array order.
///
/// Each contribution is prefixed with a kind tag, so `"1"`, `1` and `true`
/// never share a digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueHasher {
    domain: &'static str,
}

impl Default for ValueHasher {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl ValueHasher {
    /// Hasher used by the differ.
    pub const DEFAULT: Self = Self {
        domain: "jsondiff-value-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }

    /// Digest a value.
    pub fn digest(&self, value: &Value) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        self.feed(&mut hasher, value);
        finish(&hasher)
    }

    fn feed(&self, hasher: &mut blake3::Hasher, value: &Value) {
        hasher.update(&[kind_tag(Kind::of(value))]);
        match value {
            Value::Null => {
                hasher.update(&[NULL_MARKER]);
            }
            Value::Bool(b) => {
                hasher.update(&[u8::from(*b)]);
            }
            Value::String(s) => {
                hasher.update(s.as_bytes());
            }
            Value::Number(n) => {
                hasher.update(canonical_number(n).as_bytes());
            }
            Value::Array(items) => {
                for item in items {
                    hasher.update(&self.digest(item).to_le_bytes());
                }
            }
            Value::Object(map) => self.feed_object(hasher, map),
        }
    }

    fn feed_object(&self, hasher: &mut blake3::Hasher, map: &Map<String, Value>) {
        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort_unstable();
        for key in keys {
            // Length prefix delimits the key from the value digest.
            hasher.update(&(key.len() as u64).to_le_bytes());
            hasher.update(key.as_bytes());
            hasher.update(&self.digest(&map[key]).to_le_bytes());
        }
    }
}

fn finish(hasher: &blake3::Hasher) -> Digest {
    let hash = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

fn kind_tag(kind: Kind) -> u8 {
    match kind {
        Kind::Null => 0,
        Kind::Bool => 1,
        Kind::Number => 2,
        Kind::String => 3,
        Kind::Array => 4,
        Kind::Object => 5,
    }
}

/// Default string form of a number, with integral floats written as the
/// exact integer they denote.
///
/// Numbers that compare equal must digest the same, so this goes through the
/// same integer view as equality.
fn canonical_number(n: &Number) -> String {
    match exact_integer(n) {
        Some(i) => i.to_string(),
        None => match n.as_f64() {
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn digest(v: &Value) -> Digest {
        ValueHasher::DEFAULT.digest(v)
    }

    #[test]
    fn digest_is_deterministic() {
        let v = json!({"a": [1, 2, {"b": null}], "c": "text"});
        assert_eq!(digest(&v), digest(&v));
    }

    #[test]
    fn repeated_calls_do_not_share_state() {
        let hasher = ValueHasher::default();
        let first = hasher.digest(&json!("x"));
        hasher.digest(&json!({"noise": [1, 2, 3]}));
        assert_eq!(hasher.digest(&json!("x")), first);
    }

    #[test]
    fn object_digest_ignores_key_order() {
        let a: Value = serde_json::from_str(r#"{"name":"foo","age":41}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"age":41,"name":"foo"}"#).unwrap();
        assert_eq!(digest(&a), digest(&b));
    }

    #[test]
    fn array_digest_respects_order() {
        assert_ne!(digest(&json!([1, 2, 3])), digest(&json!([1, 3, 2])));
    }

    #[test]
    fn different_kinds_do_not_collide() {
        let one_str = digest(&json!("1"));
        let one_num = digest(&json!(1));
        let truth = digest(&json!(true));
        assert_ne!(one_str, one_num);
        assert_ne!(one_num, truth);
        assert_ne!(digest(&json!(null)), digest(&json!("")));
        assert_ne!(digest(&json!([])), digest(&json!({})));
    }

    #[test]
    fn integral_float_matches_integer() {
        let int: Value = serde_json::from_str("1").unwrap();
        let float: Value = serde_json::from_str("1.0").unwrap();
        assert_eq!(digest(&int), digest(&float));
        assert_ne!(digest(&json!(1.5)), digest(&json!(1)));
    }

    #[test]
    fn negative_zero_matches_zero() {
        assert_eq!(digest(&json!(-0.0)), digest(&json!(0)));
    }

    #[test]
    fn object_key_boundaries_matter() {
        assert_ne!(digest(&json!({"ab": "c"})), digest(&json!({"a": "bc"})));
    }

    #[test]
    fn nested_change_changes_digest() {
        let a = json!({"map": {"inner": [1, {"x": 1}]}});
        let b = json!({"map": {"inner": [1, {"x": 2}]}});
        assert_ne!(digest(&a), digest(&b));
    }

    #[test]
    fn custom_domain_changes_digest() {
        let v = json!({"k": "v"});
        let custom = ValueHasher::new("my-domain-v1");
        assert_eq!(custom.domain(), "my-domain-v1");
        assert_ne!(custom.digest(&v), ValueHasher::DEFAULT.digest(&v));
    }

    #[test]
    fn canonical_numbers() {
        assert_eq!(canonical_number(&Number::from(42)), "42");
        assert_eq!(canonical_number(&Number::from(-3)), "-3");
        assert_eq!(canonical_number(&Number::from(u64::MAX)), u64::MAX.to_string());
        assert_eq!(canonical_number(&Number::from_f64(2.0).unwrap()), "2");
        assert_eq!(canonical_number(&Number::from_f64(2.5).unwrap()), "2.5");
        assert_eq!(
            canonical_number(&Number::from_f64(9_223_372_036_854_775_808.0).unwrap()),
            "9223372036854775808"
        );
    }

    #[test]
    fn digest_agrees_with_exact_integer_at_f64_precision_limit() {
        let odd: Value = serde_json::from_str("9007199254740993").unwrap();
        let even: Value = serde_json::from_str("9007199254740992").unwrap();
        let float: Value = serde_json::from_str("9007199254740992.0").unwrap();
        assert_ne!(digest(&odd), digest(&float));
        assert_eq!(digest(&even), digest(&float));
    }

    proptest! {
        #[test]
        fn equal_string_maps_digest_equal(pairs in proptest::collection::vec(("[a-z]{1,4}", any::<i32>()), 0..12)) {
            let forward: Map<String, Value> = pairs
                .iter()
                .map(|(k, v)| (k.clone(), json!(v)))
                .collect();
            let backward: Map<String, Value> = pairs
                .iter()
                .rev()
                .map(|(k, v)| (k.clone(), json!(v)))
                .collect();
            // Duplicate keys keep the last write, so only compare when both
            // directions agree on content.
            if forward == backward {
                prop_assert_eq!(digest(&Value::Object(forward)), digest(&Value::Object(backward)));
            }
        }

        #[test]
        fn digest_is_stable_across_calls(s in ".{0,32}", n in any::<i64>()) {
            let v = json!({"s": &s, "n": n, "list": [n, &s]});
            prop_assert_eq!(digest(&v), digest(&v.clone()));
        }
    }
}
