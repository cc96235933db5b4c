//! Section map: the typed `section_id -> content` mapping of one document
//! version.
//!
//! Keys are kept in a `BTreeMap`, so iteration order and serialization are
//! sorted by section id. Both the fingerprint and the diff output order rely
//! on that.

use crate::errors::RegwatchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Validated mapping of section id to plain-text section content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct SectionMap(BTreeMap<String, String>);

impl SectionMap {
    /// Create an empty section map
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build from typed pairs, rejecting empty section ids.
    ///
    /// # Errors
    ///
    /// `EmptySectionId` when any key is empty or whitespace-only.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, RegwatchError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::try_from(map)
    }

    /// Build from untyped JSON, as handed over by a document source.
    ///
    /// The root must be an object and every value a string.
    ///
    /// # Errors
    ///
    /// - `SectionMapNotObject` if the root is not an object
    /// - `NonStringSection` naming the first offending key (sorted order)
    /// - `EmptySectionId` for blank keys
    pub fn from_json_value(value: &Value) -> Result<Self, RegwatchError> {
        let obj = value
            .as_object()
            .ok_or_else(|| RegwatchError::SectionMapNotObject {
                found: json_type_name(value).to_string(),
            })?;

        let mut map = BTreeMap::new();
        let mut keys: Vec<&String> = obj.keys().collect();
        keys.sort();
        for key in keys {
            match &obj[key] {
                Value::String(text) => {
                    map.insert(key.clone(), text.clone());
                }
                other => {
                    return Err(RegwatchError::NonStringSection {
                        section_id: key.clone(),
                        found: json_type_name(other).to_string(),
                    })
                }
            }
        }
        Self::try_from(map)
    }

    /// Insert or replace one section.
    ///
    /// # Errors
    ///
    /// `EmptySectionId` for a blank id.
    pub fn insert(
        &mut self,
        section_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Option<String>, RegwatchError> {
        let section_id = section_id.into();
        if section_id.trim().is_empty() {
            return Err(RegwatchError::EmptySectionId);
        }
        Ok(self.0.insert(section_id, content.into()))
    }

    /// Content of one section
    pub fn get(&self, section_id: &str) -> Option<&str> {
        self.0.get(section_id).map(String::as_str)
    }

    pub fn contains(&self, section_id: &str) -> bool {
        self.0.contains_key(section_id)
    }

    /// Section ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `(section_id, content)` pairs in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total content length in bytes, used for capture statistics
    pub fn content_bytes(&self) -> usize {
        self.0.values().map(String::len).sum()
    }

    /// Canonical serialization: compact JSON object with keys in sorted order
    /// and values verbatim.
    ///
    /// # Errors
    ///
    /// `Serialization` if JSON encoding fails.
    pub fn canonical_json(&self) -> Result<String, RegwatchError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl TryFrom<BTreeMap<String, String>> for SectionMap {
    type Error = RegwatchError;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        if map.keys().any(|k| k.trim().is_empty()) {
            return Err(RegwatchError::EmptySectionId);
        }
        Ok(Self(map))
    }
}

impl From<SectionMap> for BTreeMap<String, String> {
    fn from(map: SectionMap) -> Self {
        map.0
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
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
    fn test_from_json_accepts_string_values() {
        let map = SectionMap::from_json_value(&json!({"b": "two", "a": "one"})).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.ids().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some("one"));
    }

    #[test]
    fn test_from_json_rejects_non_object_root() {
        let err = SectionMap::from_json_value(&json!(["a", "b"])).unwrap_err();
        assert_eq!(
            err,
            RegwatchError::SectionMapNotObject {
                found: "array".to_string()
            }
        );
    }

    #[test]
    fn test_from_json_rejects_non_string_value() {
        let err = SectionMap::from_json_value(&json!({"a": "ok", "b": 42})).unwrap_err();
        assert_eq!(
            err,
            RegwatchError::NonStringSection {
                section_id: "b".to_string(),
                found: "number".to_string()
            }
        );
    }

    #[test]
    fn test_from_json_rejects_nested_object() {
        let err = SectionMap::from_json_value(&json!({"a": {"content": "x"}})).unwrap_err();
        assert!(matches!(err, RegwatchError::NonStringSection { .. }));
    }

    #[test]
    fn test_blank_section_id_rejected() {
        assert_eq!(
            SectionMap::from_pairs([("  ", "text")]).unwrap_err(),
            RegwatchError::EmptySectionId
        );
        let mut map = SectionMap::new();
        assert!(map.insert("", "x").is_err());
        assert!(map.is_empty());
    }

    #[test]
    fn test_canonical_json_is_key_sorted() {
        let map = SectionMap::from_pairs([("z", "last"), ("a", "first")]).unwrap();
        assert_eq!(
            map.canonical_json().unwrap(),
            r#"{"a":"first","z":"last"}"#
        );
    }

    #[test]
    fn test_serde_round_trip_validates() {
        let parsed: Result<SectionMap, _> = serde_json::from_str(r#"{"":"x"}"#);
        assert!(parsed.is_err());
        let parsed: SectionMap = serde_json::from_str(r#"{"a":"x"}"#).unwrap();
        assert_eq!(parsed.get("a"), Some("x"));
    }
}
