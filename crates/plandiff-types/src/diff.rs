//! Structural diffs between two property trees.
//!
//! These shapes are produced by an upstream differ and consumed read-only by
//! the renderer. Within an [`ObjectDiff`] each key lives in exactly one of
//! the four maps; within an [`ArrayDiff`] each index does.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::value::{PropertyKey, PropertyMap, PropertyValue};

/// The diff between two objects, split by what happened to each key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectDiff {
    pub adds: PropertyMap,
    pub deletes: PropertyMap,
    pub updates: BTreeMap<PropertyKey, ValueDiff>,
    pub sames: PropertyMap,
}

impl ObjectDiff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_add(mut self, key: impl Into<PropertyKey>, value: impl Into<PropertyValue>) -> Self {
        self.adds.insert(key.into(), value.into());
        self
    }

    pub fn with_delete(mut self, key: impl Into<PropertyKey>, value: impl Into<PropertyValue>) -> Self {
        self.deletes.insert(key.into(), value.into());
        self
    }

    pub fn with_update(mut self, key: impl Into<PropertyKey>, diff: ValueDiff) -> Self {
        self.updates.insert(key.into(), diff);
        self
    }

    pub fn with_same(mut self, key: impl Into<PropertyKey>, value: impl Into<PropertyValue>) -> Self {
        self.sames.insert(key.into(), value.into());
        self
    }

    /// Every key in the diff, sorted lexicographically.
    pub fn keys(&self) -> Vec<&PropertyKey> {
        let keys: BTreeSet<&PropertyKey> = self
            .adds
            .keys()
            .chain(self.deletes.keys())
            .chain(self.updates.keys())
            .chain(self.sames.keys())
            .collect();
        keys.into_iter().collect()
    }

    /// Returns `true` if no key appears in more than one map.
    pub fn is_disjoint(&self) -> bool {
        let total = self.adds.len() + self.deletes.len() + self.updates.len() + self.sames.len();
        total == self.keys().len()
    }
}

/// The diff of a single value.
///
/// At most one of `array` and `object` is set. When neither is, the value is
/// a leaf whose scalar content or kind changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueDiff {
    pub old: PropertyValue,
    pub new: PropertyValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array: Option<ArrayDiff>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectDiff>,
}

impl ValueDiff {
    pub fn leaf(old: impl Into<PropertyValue>, new: impl Into<PropertyValue>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
            array: None,
            object: None,
        }
    }

    pub fn array(old: impl Into<PropertyValue>, new: impl Into<PropertyValue>, diff: ArrayDiff) -> Self {
        Self {
            array: Some(diff),
            ..Self::leaf(old, new)
        }
    }

    pub fn object(old: impl Into<PropertyValue>, new: impl Into<PropertyValue>, diff: ObjectDiff) -> Self {
        Self {
            object: Some(diff),
            ..Self::leaf(old, new)
        }
    }
}

/// The diff between two arrays, split by what happened to each index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayDiff {
    /// Length of the longer of the two arrays.
    pub len: usize,
    pub adds: BTreeMap<usize, PropertyValue>,
    pub deletes: BTreeMap<usize, PropertyValue>,
    pub updates: BTreeMap<usize, ValueDiff>,
    pub sames: BTreeMap<usize, PropertyValue>,
}

impl ArrayDiff {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ..Self::default()
        }
    }

    pub fn with_add(mut self, index: usize, value: impl Into<PropertyValue>) -> Self {
        self.adds.insert(index, value.into());
        self
    }

    pub fn with_delete(mut self, index: usize, value: impl Into<PropertyValue>) -> Self {
        self.deletes.insert(index, value.into());
        self
    }

    pub fn with_update(mut self, index: usize, diff: ValueDiff) -> Self {
        self.updates.insert(index, diff);
        self
    }

    pub fn with_same(mut self, index: usize, value: impl Into<PropertyValue>) -> Self {
        self.sames.insert(index, value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_sorted_union() {
        let diff = ObjectDiff::new()
            .with_same("zone", "a")
            .with_add("b", 1.0)
            .with_update("a", ValueDiff::leaf(1.0, 2.0))
            .with_delete("m", true);
        let keys: Vec<_> = diff.keys().into_iter().map(PropertyKey::as_str).collect();
        assert_eq!(keys, ["a", "b", "m", "zone"]);
        assert!(diff.is_disjoint());
    }

    #[test]
    fn overlapping_maps_are_detected() {
        let diff = ObjectDiff::new().with_add("a", 1.0).with_same("a", 1.0);
        assert!(!diff.is_disjoint());
    }

    #[test]
    fn value_diff_shapes() {
        let leaf = ValueDiff::leaf("a", "b");
        assert!(leaf.array.is_none() && leaf.object.is_none());
        let nested = ValueDiff::object(
            PropertyValue::object([("x", 1.0)]),
            PropertyValue::object([("x", 2.0)]),
            ObjectDiff::new().with_update("x", ValueDiff::leaf(1.0, 2.0)),
        );
        assert!(nested.object.is_some());
        assert!(nested.array.is_none());
    }

    #[test]
    fn array_diff_serde_roundtrip() {
        let diff = ArrayDiff::new(3)
            .with_same(0, "a")
            .with_update(1, ValueDiff::leaf("b", "c"))
            .with_add(2, "d");
        let json = serde_json::to_string(&diff).unwrap();
        let parsed: ArrayDiff = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, diff);
    }

    #[test]
    fn object_diff_maps_default_when_absent() {
        let parsed: ObjectDiff =
            serde_json::from_str(r#"{"adds": {"a": {"kind": "bool", "value": true}}}"#).unwrap();
        assert_eq!(parsed, ObjectDiff::new().with_add("a", true));
    }
}
