use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_textual::{toml, value, Codec, CodecOptions, Error, TomlCodec, Value};
use std::collections::HashMap;

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
struct Tls {
    enabled: bool,
    #[serde(rename = "cert_file")]
    cert: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
struct Server {
    host: String,
    port: u16,
    tls: Tls,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
struct DbOptions {
    timeout: f64,
    retries: i32,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
struct Database {
    url: String,
    options: DbOptions,
    replicas: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default, Clone)]
struct Config {
    title: String,
    server: Server,
    database: Database,
    features: HashMap<String, bool>,
}

fn sample_config() -> Config {
    let mut features = HashMap::new();
    features.insert("beta".to_string(), true);
    features.insert("dark-mode".to_string(), false);

    Config {
        title: "Example".to_string(),
        server: Server {
            host: "localhost".to_string(),
            port: 8080,
            tls: Tls {
                enabled: true,
                cert: "/etc/cert.pem".to_string(),
            },
        },
        database: Database {
            url: "postgres://localhost/app".to_string(),
            options: DbOptions {
                timeout: 2.5,
                retries: 3,
            },
            replicas: vec!["r1".to_string(), "r2".to_string()],
        },
        features,
    }
}

#[test]
fn test_config_round_trip() {
    let codec = TomlCodec::new();
    let config = sample_config();

    let bytes = codec.encode(&config).unwrap();
    println!("Encoded:\n{}", String::from_utf8_lossy(&bytes));

    let mut decoded = Config::default();
    codec.decode(&bytes, &mut decoded).unwrap();
    assert_eq!(decoded, config);
}

#[test]
fn test_encode_flattens_to_dotted_keys() {
    let mut config = sample_config();
    config.features.clear();

    let text = toml::to_string(&config).unwrap();
    let expected = [
        r#"title = "Example""#,
        r#"server.host = "localhost""#,
        "server.port = 8080",
        "server.tls.enabled = true",
        r#"server.tls.cert_file = "/etc/cert.pem""#,
        r#"database.url = "postgres://localhost/app""#,
        "database.options.timeout = 2.5",
        "database.options.retries = 3",
        r#"database.replicas = ["r1", "r2"]"#,
    ]
    .join("\n");
    assert_eq!(text, expected);
    assert!(!text.contains("[server]"));
}

#[test]
fn test_decode_header_document() {
    let input = r#"
# Service configuration
title = "Example"

[server]
host = "localhost"
port = 8080

[server.tls]
enabled = true
cert_file = '/etc/cert.pem'

[database]
url = "postgres://localhost/app"
replicas = [
    "r1",
    "r2",
]

[database.options]
timeout = 2.5
retries = 3

[features]
beta = true
"dark-mode" = false
"#;

    let config: Config = toml::from_str(input).unwrap();
    assert_eq!(config, sample_config());
}

#[test]
fn test_nested_table_header() {
    let table = toml::parse("[a.b]\nk = 1").unwrap();
    let k = table
        .get("a")
        .and_then(|a| a.get("b"))
        .and_then(|b| b.get("k"));
    assert_eq!(k, Some(&Value::Integer(1)));
}

#[test]
fn test_redeclaring_value_as_table_fails() {
    match toml::parse("[a]\nk = 1\n[a.k]\nx = 2") {
        Err(Error::Syntax { line, msg, .. }) => {
            assert_eq!(line, 3);
            assert!(msg.contains("a.k"), "{}", msg);
        }
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_duplicate_key_fails() {
    assert!(matches!(
        toml::parse("a = 1\na = 2"),
        Err(Error::Syntax { line: 2, .. })
    ));
    assert!(matches!(
        toml::parse("a.b = 1\n[a]\nb = 2"),
        Err(Error::Syntax { .. })
    ));
}

#[test]
fn test_malformed_input_is_syntax_error() {
    let inputs = [
        "invalid = toml]",
        "key = ",
        "key value",
        "= 1",
        "[table",
        "[[array]",
        "key = unquoted",
        "key = [1, 2",
        "key = \"open",
        "a = 1 b = 2",
        "a = {",
    ];

    for input in inputs {
        let mut config = sample_config();
        let result = TomlCodec::new().decode(input.as_bytes(), &mut config);
        match result {
            Err(Error::Syntax { .. }) => {}
            other => panic!("Expected syntax error for {:?}, got {:?}", input, other),
        }
        assert_eq!(config, sample_config(), "destination changed for {:?}", input);
    }
}

#[test]
fn test_missing_keys_merge_into_destination() {
    let mut config = sample_config();
    toml::decode_into("[server]\nport = 9090\n", &mut config).unwrap();

    assert_eq!(config.server.port, 9090);
    assert_eq!(config.server.host, "localhost");
    assert!(config.server.tls.enabled);
    assert_eq!(config.title, "Example");
    assert_eq!(config.database.replicas, vec!["r1", "r2"]);
}

#[test]
fn test_integer_widens_and_float_does_not_narrow() {
    let options: DbOptions = toml::from_str("timeout = 3\nretries = 1").unwrap();
    assert_eq!(options.timeout, 3.0);

    match toml::from_str::<DbOptions>("retries = 3.0") {
        Err(Error::TypeMismatch { path, .. }) => assert_eq!(path, "retries"),
        other => panic!("Expected type mismatch, got {:?}", other),
    }
}

#[test]
fn test_type_mismatch_path() {
    let input = "[database]\nreplicas = [\"a\", 2]";
    match toml::from_str::<Config>(input) {
        Err(Error::TypeMismatch { path, .. }) => assert_eq!(path, "database.replicas[1]"),
        other => panic!("Expected type mismatch, got {:?}", other),
    }
}

#[test]
fn test_array_of_tables() {
    #[derive(Deserialize, Debug, PartialEq)]
    struct Product {
        name: String,
        sku: i64,
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Catalog {
        products: Vec<Product>,
    }

    let input = "[[products]]\nname = \"Hammer\"\nsku = 738594937\n\n[[products]]\nname = \"Nail\"\nsku = 284758393\n";
    let catalog: Catalog = toml::from_str(input).unwrap();
    assert_eq!(
        catalog.products,
        vec![
            Product {
                name: "Hammer".to_string(),
                sku: 738594937,
            },
            Product {
                name: "Nail".to_string(),
                sku: 284758393,
            },
        ]
    );
}

#[test]
fn test_timestamps_decode_into_datetime() {
    #[derive(Deserialize, Debug)]
    struct Release {
        published: DateTime<FixedOffset>,
        label: String,
    }

    let release: Release =
        toml::from_str("published = 1979-05-27T07:32:00-08:00\nlabel = 1979-05-27T15:32:00Z").unwrap();
    assert_eq!(
        release.published,
        DateTime::parse_from_rfc3339("1979-05-27T07:32:00-08:00").unwrap()
    );
    assert_eq!(release.label, "1979-05-27T15:32:00+00:00");
}

#[test]
fn test_timestamps_encode_bare() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Release {
        #[serde(with = "serde_textual::timestamp")]
        published: DateTime<FixedOffset>,
        label: String,
    }

    let release = Release {
        published: DateTime::parse_from_rfc3339("1979-05-27T07:32:00-08:00").unwrap(),
        label: "v1".to_string(),
    };
    let text = toml::to_string(&release).unwrap();
    assert_eq!(text, "published = 1979-05-27T07:32:00-08:00\nlabel = \"v1\"");

    let table = toml::parse(&text).unwrap();
    assert!(table.get("published").map_or(false, Value::is_timestamp));

    let mut back = Release {
        published: DateTime::parse_from_rfc3339("2000-01-01T00:00:00Z").unwrap(),
        label: String::new(),
    };
    toml::decode_into(&text, &mut back).unwrap();
    assert_eq!(back, release);

    toml::decode_into("label = \"v2\"", &mut back).unwrap();
    assert_eq!(back.published, release.published);
}

#[test]
fn test_none_fields_are_omitted() {
    #[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
    struct Profile {
        name: String,
        nickname: Option<String>,
        aliases: Option<Vec<String>>,
    }

    let profile = Profile {
        name: "Ann".to_string(),
        nickname: None,
        aliases: None,
    };
    assert_eq!(toml::to_string(&profile).unwrap(), r#"name = "Ann""#);

    let mut dest = Profile::default();
    TomlCodec::new()
        .decode(&toml::to_vec(&profile).unwrap(), &mut dest)
        .unwrap();
    assert_eq!(dest, profile);
}

#[test]
fn test_unsupported_shapes() {
    #[derive(Serialize)]
    struct Point {
        x: i32,
    }

    assert!(matches!(
        toml::to_string(&vec![Point { x: 1 }]),
        Err(Error::UnsupportedType(_))
    ));
    assert!(matches!(
        toml::to_string(&vec![Some(1), None]),
        Err(Error::UnsupportedType(_))
    ));
    assert!(matches!(
        toml::to_string(&f64::INFINITY),
        Err(Error::UnsupportedType(_))
    ));
}

#[test]
fn test_empty_collections() {
    let empty: HashMap<String, i64> = toml::from_str("").unwrap();
    assert!(empty.is_empty());

    #[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
    struct Lists {
        items: Vec<i64>,
    }
    let text = toml::to_string(&Lists::default()).unwrap();
    assert_eq!(text, "items = []");
    let back: Lists = toml::from_str(&text).unwrap();
    assert!(back.items.is_empty());
}

#[test]
fn test_quoted_keys_round_trip() {
    let mut map = HashMap::new();
    map.insert("plain".to_string(), 1);
    map.insert("with space".to_string(), 2);
    map.insert("dotted.key".to_string(), 3);
    map.insert("123".to_string(), 4);
    map.insert("true".to_string(), 5);

    let text = toml::to_string(&map).unwrap();
    assert!(text.contains(r#""dotted.key" = 3"#));
    let back: HashMap<String, i64> = toml::from_str(&text).unwrap();
    assert_eq!(back, map);
}

#[test]
fn test_dynamic_parse() {
    let value: Value = toml::from_str("a = [1, [2.5, \"x\"]]\n[b]\nc = false").unwrap();
    assert_eq!(value, value!({ "a": [1, [2.5, "x"]], "b": { "c": false } }));
}

#[test]
fn test_depth_limit() {
    let codec = TomlCodec::with_options(CodecOptions::new().with_max_depth(2));
    assert!(codec.parse("[a]\nb = 1").is_ok());
    assert!(matches!(
        codec.parse("[a.b.c]\nd = 1"),
        Err(Error::DepthLimitExceeded { limit: 2, .. })
    ));
    assert!(matches!(
        codec.parse("a = [[[1]]]"),
        Err(Error::DepthLimitExceeded { limit: 2, .. })
    ));
}

#[test]
fn test_strings_with_escapes_round_trip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
    struct Note {
        body: String,
    }

    let note = Note {
        body: "line one\nline \"two\"\ttabbed \\ back \u{1} é".to_string(),
    };
    let text = toml::to_string(&note).unwrap();
    assert!(!text.contains('\n'));
    assert_eq!(toml::from_str::<Note>(&text).unwrap(), note);
}
