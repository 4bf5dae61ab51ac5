//! Data - information associated by the ecosystem with a node
//!
//! `Data` is an open mapping from string keys to arbitrary values. Tools attach
//! whatever metadata they need without the base contract knowing its shape.
//!
//! The key [`RESERVED_KEY`] (`space`) is guaranteed to never be specified by unist
//! or by specifications built on it. [`Data::insert`] refuses it; maps deserialized
//! from elsewhere can be checked with [`Data::validate`].

use super::error::ShapeError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The data key that must stay unused
pub const RESERVED_KEY: &str = "space";

/// Open, tool-defined metadata attachable to any node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Data(BTreeMap<String, Value>);

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_reserved(key: &str) -> bool {
        key == RESERVED_KEY
    }

    /// Insert a value, returning the previous one for that key.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>, ShapeError> {
        let key = key.into();
        if Self::is_reserved(&key) {
            return Err(ShapeError::ReservedDataKey(key));
        }
        Ok(self.0.insert(key, value.into()))
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<Self, ShapeError> {
        self.insert(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
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

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Fails if the reserved key is present
    pub fn validate(&self) -> Result<(), ShapeError> {
        if self.contains_key(RESERVED_KEY) {
            return Err(ShapeError::ReservedDataKey(RESERVED_KEY.to_string()));
        }
        Ok(())
    }
}

impl TryFrom<serde_json::Map<String, Value>> for Data {
    type Error = ShapeError;

    fn try_from(map: serde_json::Map<String, Value>) -> Result<Self, Self::Error> {
        let data = Data(map.into_iter().collect());
        data.validate()?;
        Ok(data)
    }
}

impl<'a> IntoIterator for &'a Data {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_get() {
        let mut data = Data::new();
        assert!(data.is_empty());

        assert_eq!(data.insert("hName", "h1").unwrap(), None);
        assert_eq!(data.insert("hName", "h2").unwrap(), Some(json!("h1")));
        assert_eq!(data.get("hName"), Some(&json!("h2")));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_insert_rejects_reserved_key() {
        let mut data = Data::new();
        let err = data.insert("space", "x").unwrap_err();
        assert_eq!(err, ShapeError::ReservedDataKey("space".to_string()));
        assert!(data.is_empty());
    }

    #[test]
    fn test_values_are_arbitrary() {
        let data = Data::new()
            .with("count", 3)
            .unwrap()
            .with("nested", json!({"a": [1, 2, null]}))
            .unwrap();

        assert_eq!(data.get("count"), Some(&json!(3)));
        assert_eq!(data.get("nested"), Some(&json!({"a": [1, 2, null]})));
        assert_eq!(data.keys().count(), 2);
    }

    #[test]
    fn test_deserialized_reserved_key_fails_validation() {
        let data: Data = serde_json::from_value(json!({"space": "x", "other": 1})).unwrap();
        assert!(data.validate().is_err());

        let clean: Data = serde_json::from_value(json!({"other": 1})).unwrap();
        assert!(clean.validate().is_ok());
    }

    #[test]
    fn test_try_from_map() {
        let map = json!({"id": "abc"}).as_object().cloned().unwrap();
        let data = Data::try_from(map).unwrap();
        assert_eq!(data.get("id"), Some(&json!("abc")));

        let reserved = json!({"space": true}).as_object().cloned().unwrap();
        assert!(Data::try_from(reserved).is_err());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let data = Data::new().with("a", 1).unwrap();
        assert_eq!(serde_json::to_value(&data).unwrap(), json!({"a": 1}));
    }
}
