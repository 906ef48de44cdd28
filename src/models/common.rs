//! Common types shared across RT API models.
//!
//! This module defines the `Item` reference shape that RT embeds in most
//! records, and the identifier decoding used for every `id` field.

use serde::{Deserialize, Deserializer, Serialize};

/// A reference to another RT record.
///
/// RT links records together with small `{ "_url", "type", "id" }`
/// objects. Richer resource types embed this by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// REST URL of the referenced record.
    #[serde(
        rename = "_url",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub url: String,

    /// Record type (e.g. "ticket", "user", "queue").
    #[serde(
        rename = "type",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub item_type: String,

    /// Record identifier, always normalized to a string.
    #[serde(
        default,
        deserialize_with = "identifier::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub id: String,
}

/// Decoding for RT identifier fields.
///
/// RT returns the same `id` field as a JSON string on some endpoints and
/// a JSON number on others. Both are normalized to a string:
///
/// - `"42"` decodes to `"42"`
/// - `42` and `42.0` decode to `"42"`; fractional parts are truncated
/// - `null` decodes to `""` (pair with `#[serde(default)]` for absence)
/// - booleans, arrays and objects are rejected
///
/// Use with `#[serde(default, deserialize_with = "identifier::deserialize")]`.
pub mod identifier {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::Deserializer;

    /// Deserializes a string, number or null into an identifier string.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IdentifierVisitor)
    }

    /// Normalizes an already parsed JSON value into an identifier string.
    pub fn from_value(value: &serde_json::Value) -> Result<String, serde_json::Error> {
        deserialize(value)
    }

    struct IdentifierVisitor;

    impl<'de> Visitor<'de> for IdentifierVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, a number, or null")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(IdentifierVisitor)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        // Truncates toward zero, and saturates at the i64 bounds (1e30 becomes
        // "9223372036854775807", NaN becomes "0"). RT has only been seen
        // emitting integral ids, so a fractional or out-of-range id would
        // point at an upstream change worth checking.
        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok((value as i64).to_string())
        }
    }
}

/// Deserializes `null` as `T::default()`.
///
/// RT sometimes sends `null` in place of an empty reference or list.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id_of(input: &str) -> Result<String, serde_json::Error> {
        serde_json::from_str::<Item>(input).map(|item| item.id)
    }

    #[test]
    fn test_identifier_from_string() {
        assert_eq!(id_of(r#"{"id":"42"}"#).unwrap(), "42");
        assert_eq!(id_of(r#"{"id":"root"}"#).unwrap(), "root");
    }

    #[test]
    fn test_identifier_from_number() {
        assert_eq!(id_of(r#"{"id":42}"#).unwrap(), "42");
        assert_eq!(id_of(r#"{"id":-3}"#).unwrap(), "-3");
        assert_eq!(id_of(r#"{"id":42.0}"#).unwrap(), "42");
    }

    #[test]
    fn test_identifier_truncates_fraction() {
        assert_eq!(id_of(r#"{"id":42.7}"#).unwrap(), "42");
        assert_eq!(id_of(r#"{"id":-2.9}"#).unwrap(), "-2");
    }

    #[test]
    fn test_identifier_saturates_out_of_range_float() {
        assert_eq!(id_of(r#"{"id":1e30}"#).unwrap(), i64::MAX.to_string());
        assert_eq!(id_of(r#"{"id":-1e30}"#).unwrap(), i64::MIN.to_string());
    }

    #[test]
    fn test_identifier_null_or_absent_is_empty() {
        assert_eq!(id_of(r#"{}"#).unwrap(), "");
        assert_eq!(id_of(r#"{"id":null}"#).unwrap(), "");
    }

    #[test]
    fn test_identifier_rejects_other_types() {
        let err = id_of(r#"{"id":true}"#).unwrap_err();
        assert!(err.to_string().contains("boolean"));

        let err = id_of(r#"{"id":[1]}"#).unwrap_err();
        assert!(err.to_string().contains("sequence"));

        let err = id_of(r#"{"id":{"value":1}}"#).unwrap_err();
        assert!(err.to_string().contains("map"));
    }

    #[test]
    fn test_identifier_from_value() {
        assert_eq!(identifier::from_value(&json!("7")).unwrap(), "7");
        assert_eq!(identifier::from_value(&json!(7)).unwrap(), "7");
        assert_eq!(identifier::from_value(&json!(null)).unwrap(), "");
        assert!(identifier::from_value(&json!(false)).is_err());
    }

    #[test]
    fn test_item_decodes_reference() {
        let item: Item = serde_json::from_value(json!({
            "_url": "https://rt.example.com/REST/2.0/ticket/12",
            "type": "ticket",
            "id": 12
        }))
        .unwrap();

        assert_eq!(item.url, "https://rt.example.com/REST/2.0/ticket/12");
        assert_eq!(item.item_type, "ticket");
        assert_eq!(item.id, "12");
    }

    #[test]
    fn test_null_as_default() {
        #[derive(Deserialize)]
        struct Holder {
            #[serde(default, deserialize_with = "null_as_default")]
            items: Vec<Item>,
        }

        let holder: Holder = serde_json::from_str(r#"{"items":null}"#).unwrap();
        assert!(holder.items.is_empty());

        let holder: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert!(holder.items.is_empty());
    }
}
