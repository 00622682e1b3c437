//! Property-based tests for the round-trip guarantee of both codecs and for
//! the parser never panicking on arbitrary input.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_textual::{json, toml, Codec, Format};
use std::collections::BTreeMap;

fn roundtrip<T>(format: Format, value: &T) -> bool
where
    T: Serialize + for<'de> Deserialize<'de> + PartialEq + Default + std::fmt::Debug,
{
    match format.encode(value) {
        Ok(bytes) => {
            let mut decoded = T::default();
            match format.decode(&bytes, &mut decoded) {
                Ok(()) => *value == decoded,
                Err(e) => {
                    eprintln!("{} decode failed: {}", format, e);
                    eprintln!("Encoded was: {}", String::from_utf8_lossy(&bytes));
                    false
                }
            }
        }
        Err(e) => {
            eprintln!("{} encode failed: {}", format, e);
            false
        }
    }
}

fn both<T>(value: &T) -> bool
where
    T: Serialize + for<'de> Deserialize<'de> + PartialEq + Default + std::fmt::Debug,
{
    roundtrip(Format::Json, value) && roundtrip(Format::Toml, value)
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
struct Inner {
    flag: bool,
    count: u16,
    weights: Vec<f64>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
struct Outer {
    id: i64,
    #[serde(rename = "display-name")]
    name: String,
    nickname: Option<String>,
    inner: Inner,
    scores: BTreeMap<String, i32>,
    matrix: Vec<Vec<i8>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
struct Wrapper<T> {
    value: T,
}

fn inner_strategy() -> impl Strategy<Value = Inner> {
    (
        any::<bool>(),
        any::<u16>(),
        // Quarter steps stay exact for any decimal parser.
        prop::collection::vec((-4_000_000i32..4_000_000).prop_map(|n| f64::from(n) / 4.0), 0..5),
    )
        .prop_map(|(flag, count, weights)| Inner {
            flag,
            count,
            weights,
        })
}

fn outer_strategy() -> impl Strategy<Value = Outer> {
    (
        any::<i64>(),
        ".*",
        proptest::option::of("[a-z]{0,8}"),
        inner_strategy(),
        prop::collection::btree_map("[a-zA-Z0-9 ._-]{1,10}", any::<i32>(), 0..5),
        prop::collection::vec(prop::collection::vec(any::<i8>(), 0..4), 0..4),
    )
        .prop_map(|(id, name, nickname, inner, scores, matrix)| Outer {
            id,
            name,
            nickname,
            inner,
            scores,
            matrix,
        })
}

proptest! {
    #[test]
    fn prop_i64(n in any::<i64>()) {
        let wrapped = Wrapper { value: n };
        prop_assert!(both(&wrapped));
    }

    #[test]
    fn prop_u32(n in any::<u32>()) {
        let wrapped = Wrapper { value: n };
        prop_assert!(both(&wrapped));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        let wrapped = Wrapper { value: b };
        prop_assert!(both(&wrapped));
    }

    #[test]
    fn prop_finite_f64(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let wrapped = Wrapper { value: f };
        prop_assert!(both(&wrapped));
    }

    #[test]
    fn prop_string(s in ".*") {
        let wrapped = Wrapper { value: s };
        prop_assert!(both(&wrapped));
    }

    #[test]
    fn prop_char(c in any::<char>()) {
        let wrapped = Wrapper { value: c.to_string() };
        prop_assert!(both(&wrapped));
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        let wrapped = Wrapper { value: v };
        prop_assert!(both(&wrapped));
    }

    #[test]
    fn prop_nested_vec(v in prop::collection::vec(prop::collection::vec(any::<bool>(), 0..4), 0..4)) {
        let wrapped = Wrapper { value: v };
        prop_assert!(both(&wrapped));
    }

    #[test]
    fn prop_option_json(opt in proptest::option::of(any::<i32>())) {
        let wrapped = Wrapper { value: opt };
        prop_assert!(roundtrip(Format::Json, &wrapped));
    }

    #[test]
    fn prop_option_toml(opt in proptest::option::of(any::<i32>())) {
        let wrapped = Wrapper { value: opt };
        prop_assert!(roundtrip(Format::Toml, &wrapped));
    }

    #[test]
    fn prop_string_map(m in prop::collection::btree_map(".{0,12}", any::<i64>(), 0..8)) {
        let wrapped = Wrapper { value: m };
        prop_assert!(both(&wrapped));
    }

    #[test]
    fn prop_struct(outer in outer_strategy()) {
        prop_assert!(both(&outer));
    }

    #[test]
    fn prop_json_text_is_valid_for_serde_json(outer in outer_strategy()) {
        let text = json::to_string(&outer).unwrap();
        let parsed: Outer = serde_json::from_str(&text).unwrap();
        prop_assert_eq!(parsed, outer);
    }

    #[test]
    fn prop_json_parse_never_panics(s in "\\PC{0,64}") {
        let _ = json::parse(&s);
    }

    #[test]
    fn prop_json_parse_structured_noise(s in "[\\[\\]{}:,\"0-9a-z .eE+-]{0,48}") {
        let _ = json::parse(&s);
    }

    #[test]
    fn prop_toml_parse_never_panics(s in "[\\[\\]=.,\"'#a-z0-9 \\n_-]{0,64}") {
        let _ = toml::parse(&s);
    }
}
