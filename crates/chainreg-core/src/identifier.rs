//! Chain identifiers accepted by lookups and selectors.
//!
//! A chain may be addressed by numeric ID or by name. Textual identifiers
//! are ambiguous: `"137"` is tried as an ID first and falls back to a name
//! lookup, see [`ChainDirectory::resolve`](crate::directory::ChainDirectory::resolve).

use alloy_primitives::U256;
use serde_json::Value;

use crate::error::RegistryError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChainIdentifier {
    Id(U256),
    Name(String),
}

impl ChainIdentifier {
    /// Human-readable form used in error messages: `ID 137` or `name "Base"`.
    pub fn describe(&self) -> String {
        match self {
            Self::Id(id) => format!("ID {id}"),
            Self::Name(name) => format!("name {name:?}"),
        }
    }
}

impl std::fmt::Display for ChainIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Parse `0x`/`0o`/`0b`-prefixed or decimal integer text.
///
/// Rejects empty input and a bare prefix, both of which the `U256` parser
/// would otherwise read as zero.
pub fn parse_integer_literal(s: &str) -> Option<U256> {
    let (digits, radix) = match s.get(..2) {
        Some("0x" | "0X") => (&s[2..], 16),
        Some("0o" | "0O") => (&s[2..], 8),
        Some("0b" | "0B") => (&s[2..], 2),
        _ => (s, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    U256::from_str_radix(digits, radix).ok()
}

impl From<U256> for ChainIdentifier {
    fn from(id: U256) -> Self {
        Self::Id(id)
    }
}

impl From<u64> for ChainIdentifier {
    fn from(id: u64) -> Self {
        Self::Id(U256::from(id))
    }
}

impl From<u32> for ChainIdentifier {
    fn from(id: u32) -> Self {
        Self::Id(U256::from(id))
    }
}

impl From<usize> for ChainIdentifier {
    fn from(id: usize) -> Self {
        Self::Id(U256::from(id))
    }
}

impl From<&str> for ChainIdentifier {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ChainIdentifier {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for ChainIdentifier {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

impl TryFrom<i64> for ChainIdentifier {
    type Error = RegistryError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        u64::try_from(id)
            .map(Self::from)
            .map_err(|_| RegistryError::InvalidIdentifier(format!("negative chain ID {id}")))
    }
}

impl TryFrom<i32> for ChainIdentifier {
    type Error = RegistryError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(id))
    }
}

impl TryFrom<&Value> for ChainIdentifier {
    type Error = RegistryError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Self::Name(s.clone())),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Ok(Self::from(u))
                } else if let Some(i) = n.as_i64() {
                    Self::try_from(i)
                } else {
                    Err(RegistryError::InvalidIdentifier(format!(
                        "unsupported numeric chain identifier {n}"
                    )))
                }
            }
            other => Err(RegistryError::InvalidIdentifier(format!(
                "unsupported chain identifier type: {}",
                json_kind(other)
            ))),
        }
    }
}

impl TryFrom<Value> for ChainIdentifier {
    type Error = RegistryError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_literals() {
        assert_eq!(parse_integer_literal("137"), Some(U256::from(137u64)));
        assert_eq!(parse_integer_literal("0x89"), Some(U256::from(137u64)));
        assert_eq!(parse_integer_literal("0o211"), Some(U256::from(137u64)));
        assert_eq!(parse_integer_literal("0b10001001"), Some(U256::from(137u64)));
        assert_eq!(parse_integer_literal(""), None);
        assert_eq!(parse_integer_literal("0x"), None);
        assert_eq!(parse_integer_literal("Base"), None);
        assert_eq!(parse_integer_literal("-5"), None);
        assert_eq!(parse_integer_literal("1 2"), None);
    }

    #[test]
    fn native_integers_become_ids() {
        assert_eq!(ChainIdentifier::from(1u64), ChainIdentifier::Id(U256::from(1u64)));
        assert_eq!(ChainIdentifier::from(10u32), ChainIdentifier::Id(U256::from(10u64)));
        assert_eq!(
            ChainIdentifier::try_from(8453i64).unwrap(),
            ChainIdentifier::Id(U256::from(8453u64))
        );
    }

    #[test]
    fn negative_integers_are_invalid() {
        assert!(matches!(
            ChainIdentifier::try_from(-1i32),
            Err(RegistryError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            ChainIdentifier::try_from(&json!(-7)),
            Err(RegistryError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn dynamic_values() {
        assert_eq!(
            ChainIdentifier::try_from(&json!(137)).unwrap(),
            ChainIdentifier::Id(U256::from(137u64))
        );
        assert_eq!(
            ChainIdentifier::try_from(&json!("Polygon")).unwrap(),
            ChainIdentifier::Name("Polygon".into())
        );
        for bad in [json!(1.5), json!(true), json!(null), json!([1]), json!({"id": 1})] {
            assert!(
                matches!(ChainIdentifier::try_from(&bad), Err(RegistryError::InvalidIdentifier(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn describe_formats() {
        assert_eq!(ChainIdentifier::from(5u64).describe(), "ID 5");
        assert_eq!(ChainIdentifier::from("Base").describe(), "name \"Base\"");
    }
}
