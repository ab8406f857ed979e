//! Open attribute bag for schema keys the decoder does not recognize.
//!
//! Every key that is not one of an entity's fixed keys lands here with its
//! decoded JSON value, so generators can attach their own metadata to a
//! schema without the decoder knowing about it.
//!
//! Typed accessors come in two severities:
//!
//! - [`Attributes::bool_value`] / [`Attributes::string_value`] return `None`
//!   when the key is missing or holds another type.
//! - [`Attributes::required_bool`] / [`Attributes::required_string`] panic in
//!   the same situation. Use them for invariants the caller asserts about its
//!   own schema.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Mapping from attribute key to its decoded value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(BTreeMap<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns the boolean under `key`, or `None` if absent or not a boolean.
    pub fn bool_value(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Returns the string under `key`, or `None` if absent or not a string.
    pub fn string_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns the boolean under `key`.
    ///
    /// ## Panics
    ///
    /// Panics if the key is absent or its value is not a boolean.
    pub fn required_bool(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(other) => panic!("required attribute {key:?} is not a boolean: {other}"),
            None => panic!("required attribute {key:?} is missing"),
        }
    }

    /// Returns the string under `key`.
    ///
    /// ## Panics
    ///
    /// Panics if the key is absent or its value is not a string.
    pub fn required_string(&self, key: &str) -> &str {
        match self.get(key) {
            Some(Value::String(s)) => s,
            Some(other) => panic!("required attribute {key:?} is not a string: {other}"),
            None => panic!("required attribute {key:?} is missing"),
        }
    }

    /// Deserializes the value under `key` into `T`.
    ///
    /// Returns `Ok(None)` when the key is absent and an error when the value
    /// does not have the shape `T` expects.
    ///
    /// ## Examples
    ///
    /// ```
    /// use schemagen::object::Object;
    ///
    /// let object = Object::from_json(r#"{"name": "Key", "tags": ["a", "b"]}"#).unwrap();
    /// let tags: Option<Vec<String>> = object.attributes().decode("tags").unwrap();
    /// assert_eq!(tags, Some(vec!["a".to_string(), "b".to_string()]));
    /// ```
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, serde_json::Error> {
        self.get(key)
            .map(|value| T::deserialize(value))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag() -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("generate".into(), json!(true));
        attrs.insert("package".into(), json!("jwk"));
        attrs.insert("limit".into(), json!(16));
        attrs.insert("nothing".into(), Value::Null);
        attrs
    }

    #[test]
    fn soft_accessors_return_typed_values() {
        let attrs = bag();
        assert_eq!(attrs.bool_value("generate"), Some(true));
        assert_eq!(attrs.string_value("package"), Some("jwk"));
    }

    #[test]
    fn soft_accessors_miss_on_absent_or_mismatched() {
        let attrs = bag();
        assert_eq!(attrs.bool_value("missing"), None);
        assert_eq!(attrs.bool_value("package"), None);
        assert_eq!(attrs.string_value("limit"), None);
        assert_eq!(attrs.string_value("nothing"), None);
    }

    #[test]
    fn required_accessors_return_present_values() {
        let attrs = bag();
        assert!(attrs.required_bool("generate"));
        assert_eq!(attrs.required_string("package"), "jwk");
    }

    #[test]
    #[should_panic(expected = "required attribute \"missing\" is missing")]
    fn required_bool_panics_on_absent_key() {
        bag().required_bool("missing");
    }

    #[test]
    #[should_panic(expected = "is not a string")]
    fn required_string_panics_on_mismatch() {
        bag().required_string("generate");
    }

    #[test]
    fn decode_reads_structured_values() {
        let attrs = bag();
        assert_eq!(attrs.decode::<u32>("limit").unwrap(), Some(16));
        assert_eq!(attrs.decode::<u32>("missing").unwrap(), None);
        assert!(attrs.decode::<u32>("package").is_err());
    }

    #[test]
    fn iter_is_key_ordered() {
        let keys: Vec<_> = bag().iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["generate", "limit", "nothing", "package"]);
    }
}
