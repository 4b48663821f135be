use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::asset::{Archive, Asset};

/// The name of a property within an object.
///
/// Keys order lexicographically, which is the order every renderer emits them in.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyKey(String);

impl PropertyKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyKey({:?})", self.0)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for PropertyKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PropertyKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// A resource's properties, ordered by key.
pub type PropertyMap = BTreeMap<PropertyKey, PropertyValue>;

/// A single, untyped property value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<PropertyValue>),
    Object(PropertyMap),
    Asset(Asset),
    Archive(Archive),
    /// A value that will only be known once the step is applied. The boxed
    /// element describes its eventual type.
    Computed(Box<PropertyValue>),
    /// An output flowing from another resource that has not resolved yet.
    Output(Box<PropertyValue>),
}

impl PropertyValue {
    /// Build an object value from key/value pairs.
    pub fn object<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<PropertyKey>,
        V: Into<PropertyValue>,
    {
        PropertyValue::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn computed(element: PropertyValue) -> Self {
        PropertyValue::Computed(Box::new(element))
    }

    pub fn output(element: PropertyValue) -> Self {
        PropertyValue::Output(Box::new(element))
    }

    /// The value's type as shown in planning mode, e.g. `computed<string>`.
    pub fn type_string(&self) -> String {
        match self {
            PropertyValue::Null => "null".into(),
            PropertyValue::Bool(_) => "bool".into(),
            PropertyValue::Number(_) => "number".into(),
            PropertyValue::String(_) => "string".into(),
            PropertyValue::Array(_) => "[]".into(),
            PropertyValue::Object(_) => "object".into(),
            PropertyValue::Asset(_) => "asset".into(),
            PropertyValue::Archive(_) => "archive".into(),
            PropertyValue::Computed(elem) => format!("computed<{}>", elem.type_string()),
            PropertyValue::Output(elem) => format!("output<{}>", elem.type_string()),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(elems: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(elems)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(map: PropertyMap) -> Self {
        PropertyValue::Object(map)
    }
}

impl From<Asset> for PropertyValue {
    fn from(asset: Asset) -> Self {
        PropertyValue::Asset(asset)
    }
}

impl From<Archive> for PropertyValue {
    fn from(archive: Archive) -> Self {
        PropertyValue::Archive(archive)
    }
}
