/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// ```rust
/// use serde_textual::{value, Value};
///
/// let v = value!({ "name": "Alice", "scores": [1, 2.5, null] });
/// assert_eq!(v.get("name").and_then(Value::as_str), Some("Alice"));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Boolean(true)
    };

    (false) => {
        $crate::Value::Boolean(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Table($crate::Table::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut table = $crate::Table::new();
        $(
            table.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Table(table)
    }};

    // Any other expression goes through `to_value`; unrepresentable input becomes null.
    ($other:expr) => {
        $crate::to_value(&$other).unwrap_or($crate::Value::Null)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Table, Value};

    #[test]
    fn test_value_macro_primitives() {
        assert_eq!(value!(null), Value::Null);
        assert_eq!(value!(true), Value::Boolean(true));
        assert_eq!(value!(false), Value::Boolean(false));
        assert_eq!(value!(42), Value::Integer(42));
        assert_eq!(value!(3.5), Value::Float(3.5));
        assert_eq!(value!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_value_macro_nested() {
        assert_eq!(value!({}), Value::Table(Table::new()));

        let v = value!({
            "server": { "port": 8080 },
            "tags": ["a", "b"]
        });

        let server = v.get("server").expect("server table");
        assert_eq!(server.get("port"), Some(&Value::Integer(8080)));
        assert_eq!(
            v.get("tags"),
            Some(&Value::Array(vec![Value::from("a"), Value::from("b")]))
        );
    }
}
