use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::op::StepOp;
use crate::value::{PropertyKey, PropertyMap};

/// Unique resource name identifying a resource instance within a deployment.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Urn(String);

impl Urn {
    pub fn parse(s: impl Into<String>) -> Result<Self, TypeError> {
        let s = s.into();
        if !s.starts_with("urn:") {
            return Err(TypeError::InvalidUrn(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Urn {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Urn::parse(s)
    }
}

impl From<Urn> for String {
    fn from(urn: Urn) -> Self {
        urn.0
    }
}

impl fmt::Debug for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Urn({})", self.0)
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A snapshot of one resource: its identity and its properties.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Resource type token, e.g. `aws:s3/bucket:Bucket`.
    #[serde(rename = "type")]
    pub type_token: String,
    pub urn: Urn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Urn>,
    #[serde(default)]
    pub protect: bool,
    #[serde(default)]
    pub inputs: PropertyMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<PropertyMap>,
}

impl ResourceState {
    pub fn new(type_token: impl Into<String>, urn: Urn) -> Self {
        Self {
            type_token: type_token.into(),
            urn,
            id: None,
            parent: None,
            protect: false,
            inputs: PropertyMap::new(),
            outputs: None,
        }
    }
}

/// Everything the renderer needs to know about one step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepMetadata {
    pub op: StepOp,
    pub urn: Urn,
    #[serde(rename = "type")]
    pub type_token: String,
    /// State before the step; absent for creations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<ResourceState>,
    /// State after the step; absent for deletions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<ResourceState>,
    /// Keys whose change forces the resource to be replaced.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<PropertyKey>,
}

impl StepMetadata {
    /// The state that best describes the resource: the new one when present.
    pub fn res(&self) -> Option<&ResourceState> {
        self.new.as_ref().or(self.old.as_ref())
    }

    pub fn parent(&self) -> Option<&Urn> {
        self.res().and_then(|r| r.parent.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urn(name: &str) -> Urn {
        Urn::parse(format!("urn:pulumi:dev::web::aws:s3/bucket:Bucket::{name}")).unwrap()
    }

    #[test]
    fn urn_requires_prefix() {
        assert!(Urn::parse("urn:x").is_ok());
        assert_eq!(Urn::parse("bucket"), Err(TypeError::InvalidUrn("bucket".into())));
    }

    #[test]
    fn urn_serde_validates() {
        let ok: Result<Urn, _> = serde_json::from_str("\"urn:a\"");
        assert!(ok.is_ok());
        let bad: Result<Urn, _> = serde_json::from_str("\"a\"");
        assert!(bad.is_err());
    }

    #[test]
    fn res_prefers_new_state() {
        let mut old = ResourceState::new("t", urn("a"));
        old.id = Some("old".into());
        let mut new = ResourceState::new("t", urn("a"));
        new.id = Some("new".into());
        new.parent = Some(urn("p"));

        let mut step = StepMetadata {
            op: StepOp::Update,
            urn: urn("a"),
            type_token: "t".into(),
            old: Some(old),
            new: Some(new),
            keys: vec![],
        };
        assert_eq!(step.res().and_then(|r| r.id.as_deref()), Some("new"));
        assert_eq!(step.parent(), Some(&urn("p")));

        step.new = None;
        assert_eq!(step.res().and_then(|r| r.id.as_deref()), Some("old"));
        assert_eq!(step.parent(), None);
    }

    #[test]
    fn step_deserializes_with_defaults() {
        let json = r#"{
            "op": "create",
            "urn": "urn:pulumi:dev::web::aws:s3/bucket:Bucket::site",
            "type": "aws:s3/bucket:Bucket",
            "new": {
                "type": "aws:s3/bucket:Bucket",
                "urn": "urn:pulumi:dev::web::aws:s3/bucket:Bucket::site",
                "inputs": {"acl": {"kind": "string", "value": "private"}}
            }
        }"#;
        let step: StepMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(step.op, StepOp::Create);
        assert!(step.old.is_none());
        assert!(step.keys.is_empty());
        let new = step.new.unwrap();
        assert!(!new.protect);
        assert_eq!(new.inputs.len(), 1);
    }
}
