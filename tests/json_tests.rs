use serde::{Deserialize, Serialize};
use serde_textual::{json, value, Codec, CodecOptions, Error, JsonCodec, Value};
use std::collections::{BTreeMap, HashMap};

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
struct Address {
    street: String,
    city: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
struct Person {
    name: String,
    age: i32,
    #[serde(rename = "mail")]
    email: String,
    address: Address,
    tags: Vec<String>,
}

fn john() -> Person {
    Person {
        name: "John Doe".to_string(),
        age: 30,
        email: "john@example.com".to_string(),
        address: Address {
            street: "123 Main St".to_string(),
            city: "Anytown".to_string(),
        },
        tags: vec!["admin".to_string(), "ops".to_string()],
    }
}

#[test]
fn test_person_round_trip() {
    let codec = JsonCodec::new();
    let person = john();

    let bytes = codec.encode(&person).unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    println!("Encoded: {}", text);
    assert_eq!(
        text,
        r#"{"name":"John Doe","age":30,"mail":"john@example.com","address":{"street":"123 Main St","city":"Anytown"},"tags":["admin","ops"]}"#
    );

    let mut decoded = Person::default();
    codec.decode(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, person);
}

#[test]
fn test_decode_pretty_input() {
    let input = r#"
    {
        "name" : "Jane",
        "age"  : 41,
        "address": {
            "city": "Springfield"
        },
        "tags": [ ]
    }
    "#;

    let person: Person = json::from_str(input).unwrap();
    assert_eq!(person.name, "Jane");
    assert_eq!(person.age, 41);
    assert_eq!(person.address.city, "Springfield");
    assert_eq!(person.address.street, "");
    assert!(person.tags.is_empty());
}

#[test]
fn test_output_is_valid_json_for_serde_json() {
    let person = john();
    let text = json::to_string(&person).unwrap();

    let via_serde_json: Person = serde_json::from_str(&text).unwrap();
    assert_eq!(via_serde_json, person);
    assert_eq!(text, serde_json::to_string(&person).unwrap());
}

#[test]
fn test_parse_agrees_with_serde_json() {
    let documents = [
        r#"{"a": 1, "b": [true, false, null], "c": {"d": "e"}}"#,
        r#"[1, -2, 3.5, -0.25, 1e3, 2E-2, "x\ny", "é😀"]"#,
        r#""just a string""#,
        "0",
        "-17",
        "null",
        r#"{"nested": {"deeper": {"deepest": [[], {}, [[]]]}}}"#,
        r#"{"escape": "quote \" backslash \\ slash \/ tab \t"}"#,
    ];

    for doc in documents {
        let ours = json::parse(doc).unwrap();
        let theirs: serde_json::Value = serde_json::from_str(doc).unwrap();
        let ours_as_serde = serde_json::to_value(&ours).unwrap();
        assert_eq!(ours_as_serde, theirs, "document {}", doc);
    }
}

#[test]
fn test_numeric_kinds_are_preserved() {
    let parsed = json::parse(r#"[3, 3.0, -0, 1e2]"#).unwrap();
    assert_eq!(
        parsed,
        Value::Array(vec![
            Value::Integer(3),
            Value::Float(3.0),
            Value::Integer(0),
            Value::Float(100.0),
        ])
    );
}

#[test]
fn test_integer_widens_into_float_field() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Reading {
        celsius: f64,
    }

    let reading: Reading = json::from_str(r#"{"celsius": 3}"#).unwrap();
    assert_eq!(reading, Reading { celsius: 3.0 });
}

#[test]
fn test_float_into_integer_field_fails() {
    let result: Result<Person, _> = json::from_str(r#"{"age": 3.0}"#);
    match result {
        Err(Error::TypeMismatch { path, .. }) => assert_eq!(path, "age"),
        other => panic!("Expected type mismatch, got {:?}", other),
    }
}

#[test]
fn test_null_erases_populated_fields() {
    let mut person = john();
    json::decode_into(
        r#"{"name": null, "address": null, "tags": null}"#,
        &mut person,
    )
    .unwrap();

    assert_eq!(person.name, "");
    assert_eq!(person.address, Address::default());
    assert!(person.tags.is_empty());
    // Fields absent from the input keep their values.
    assert_eq!(person.age, 30);
    assert_eq!(person.email, "john@example.com");
}

#[test]
fn test_missing_keys_leave_fields_unchanged() {
    let mut person = john();
    json::decode_into(r#"{"address": {"city": "Shelbyville"}}"#, &mut person).unwrap();

    assert_eq!(person.name, "John Doe");
    assert_eq!(person.address.street, "123 Main St");
    assert_eq!(person.address.city, "Shelbyville");
    assert_eq!(person.tags, vec!["admin", "ops"]);
}

#[test]
fn test_unknown_keys_are_ignored() {
    let person: Person = json::from_str(r#"{"name": "Ann", "nickname": "A"}"#).unwrap();
    assert_eq!(person.name, "Ann");
}

#[test]
fn test_empty_collections() {
    let map: HashMap<String, i32> = json::from_str("{}").unwrap();
    assert!(map.is_empty());
    let list: Vec<String> = json::from_str("[]").unwrap();
    assert!(list.is_empty());

    assert_eq!(json::to_string(&Vec::<i32>::new()).unwrap(), "[]");
    assert_eq!(json::to_string(&BTreeMap::<String, i32>::new()).unwrap(), "{}");
    assert_eq!(json::to_string(&Option::<Vec<i32>>::None).unwrap(), "null");
}

#[test]
fn test_map_round_trip() {
    let mut scores = BTreeMap::new();
    scores.insert("alice".to_string(), 10);
    scores.insert("bob".to_string(), -3);

    let text = json::to_string(&scores).unwrap();
    assert_eq!(text, r#"{"alice":10,"bob":-3}"#);
    let back: BTreeMap<String, i64> = json::from_str(&text).unwrap();
    assert_eq!(back, scores);
}

#[test]
fn test_skipped_field_is_never_encoded_or_read() {
    #[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
    struct Account {
        user: String,
        #[serde(skip)]
        password: String,
    }

    let account = Account {
        user: "root".to_string(),
        password: "hunter2".to_string(),
    };
    assert_eq!(json::to_string(&account).unwrap(), r#"{"user":"root"}"#);

    let mut dest = account;
    json::decode_into(r#"{"user": "u", "password": "leaked"}"#, &mut dest).unwrap();
    assert_eq!(dest.user, "u");
    assert_eq!(dest.password, "hunter2");

    let mut fresh = Account::default();
    json::decode_into(r#"{"password": "leaked"}"#, &mut fresh).unwrap();
    assert_eq!(fresh, Account::default());
}

#[test]
fn test_malformed_input_is_syntax_error() {
    let inputs = [
        "{invalid json}",
        r#"{"a": 1"#,
        r#"{"a" 1}"#,
        r#"{"a": 1,}"#,
        "[1, 2,]",
        "[1 2]",
        r#"{"a": tru}"#,
        "01",
        "1.",
        "-",
        r#""unterminated"#,
        "{} {}",
        "",
    ];

    for input in inputs {
        let mut person = john();
        let result = JsonCodec::new().decode(input.as_bytes(), &mut person);
        match result {
            Err(Error::Syntax { .. }) => {}
            other => panic!("Expected syntax error for {:?}, got {:?}", input, other),
        }
        assert_eq!(person, john(), "destination changed for {:?}", input);
    }
}

#[test]
fn test_syntax_error_position() {
    let err = json::parse("{\n  \"a\": @\n}").unwrap_err();
    match err {
        Error::Syntax { line, col, msg } => {
            assert_eq!((line, col), (2, 8));
            assert!(msg.contains("invalid character"), "{}", msg);
        }
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_depth_limit_from_options() {
    let codec = JsonCodec::with_options(CodecOptions::new().with_max_depth(3));
    assert!(codec.parse("[[[1]]]").is_ok());
    assert!(matches!(
        codec.parse("[[[[1]]]]"),
        Err(Error::DepthLimitExceeded { limit: 3, .. })
    ));

    let deep = "[".repeat(100_000);
    assert!(matches!(
        json::parse(&deep),
        Err(Error::DepthLimitExceeded { limit: 128, .. })
    ));
}

#[test]
fn test_unsupported_values() {
    assert!(matches!(
        json::to_string(&f64::NAN),
        Err(Error::UnsupportedType(_))
    ));
    assert!(matches!(
        json::to_string(&u64::MAX),
        Err(Error::UnsupportedType(_))
    ));

    let mut by_number = HashMap::new();
    by_number.insert(1, "one");
    assert!(matches!(
        json::to_string(&by_number),
        Err(Error::UnsupportedType(_))
    ));
}

#[test]
fn test_enum_encoding() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Shape {
        Empty,
        Circle(f64),
        Rect { w: u32, h: u32 },
    }

    let shapes = vec![Shape::Empty, Shape::Circle(1.5), Shape::Rect { w: 2, h: 3 }];
    let text = json::to_string(&shapes).unwrap();
    assert_eq!(text, r#"["Empty",{"Circle":1.5},{"Rect":{"w":2,"h":3}}]"#);
    assert_eq!(json::from_str::<Vec<Shape>>(&text).unwrap(), shapes);

    // Enums have no zero value.
    assert!(json::from_str::<Shape>("null").is_err());
}

#[test]
fn test_dynamic_value_decode() {
    let value: Value = json::from_str(r#"{"k": [1, "two", null]}"#).unwrap();
    assert_eq!(value, value!({ "k": [1, "two", null] }));
    assert_eq!(json::to_string(&value).unwrap(), r#"{"k":[1,"two",null]}"#);
}

#[test]
fn test_float_rendering() {
    assert_eq!(json::to_string(&1.0f64).unwrap(), "1.0");
    assert_eq!(json::to_string(&-0.5f64).unwrap(), "-0.5");
    assert_eq!(json::to_string(&2.5f32).unwrap(), "2.5");

    let back: f64 = json::from_str(&json::to_string(&0.1f64).unwrap()).unwrap();
    assert_eq!(back, 0.1);
}

#[test]
fn test_invalid_utf8_is_reported() {
    let mut person = Person::default();
    let result = JsonCodec::new().decode(&[b'"', 0xff, b'"'], &mut person);
    assert!(matches!(result, Err(Error::InvalidUtf8(_))));
}
