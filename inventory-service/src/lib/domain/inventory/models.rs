use std::fmt;

use serde_json::json;
use serde_json::Map;
use serde_json::Value;

use super::errors::ResourceNameError;
use super::errors::ResourceValidationError;
use super::kinds::ResourceKind;

/// Name of an inventory resource, unique within its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceName(String);

impl ResourceName {
    const MAX_LENGTH: usize = 128;

    /// Validate a resource name.
    ///
    /// # Errors
    /// * `Empty` - Name is blank
    /// * `TooLong` - Longer than 128 characters
    /// * `InvalidCharacter` - Anything other than alphanumerics, `.`, `_`, `-`, `+`
    pub fn new(name: impl Into<String>) -> Result<Self, ResourceNameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ResourceNameError::Empty);
        }

        let length = name.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(ResourceNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        if let Some(c) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '+')))
        {
            return Err(ResourceNameError::InvalidCharacter(c));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An inventory record of some [`ResourceKind`].
///
/// On the wire a resource is `{"meta": {"name": ...}, "spec": {...}}`;
/// `attributes` holds the `spec` object.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub kind: &'static ResourceKind,
    pub name: ResourceName,
    pub attributes: Map<String, Value>,
}

impl Resource {
    /// Parse and validate an external representation.
    ///
    /// When `expected_name` is given, `meta.name` must equal it.
    pub fn from_payload(
        kind: &'static ResourceKind,
        payload: Value,
        expected_name: Option<&ResourceName>,
    ) -> Result<Self, ResourceValidationError> {
        let Value::Object(mut document) = payload else {
            return Err(ResourceValidationError::NotAnObject);
        };

        let name = match document.get("meta") {
            Some(Value::Object(meta)) => match meta.get("name") {
                Some(Value::String(name)) => ResourceName::new(name.as_str())?,
                _ => return Err(ResourceValidationError::MissingName),
            },
            _ => return Err(ResourceValidationError::MissingMeta),
        };

        if let Some(expected) = expected_name {
            if &name != expected {
                return Err(ResourceValidationError::NameMismatch {
                    expected: expected.to_string(),
                    actual: name.to_string(),
                });
            }
        }

        let attributes = match document.remove("spec") {
            Some(Value::Object(spec)) => spec,
            _ => return Err(ResourceValidationError::MissingSpec),
        };

        kind.validate_spec(&attributes)?;

        Ok(Self {
            kind,
            name,
            attributes,
        })
    }

    /// External representation of this resource.
    pub fn to_payload(&self) -> Value {
        json!({
            "meta": { "name": self.name.as_str() },
            "spec": self.attributes,
        })
    }

    /// Apply a JSON merge patch (RFC 7396) to the external representation
    /// and re-validate the result. The resource cannot be renamed.
    pub fn patched(&self, patch: &Value) -> Result<Self, ResourceValidationError> {
        if !patch.is_object() {
            return Err(ResourceValidationError::InvalidPatch(
                "patch must be a JSON object".to_string(),
            ));
        }

        let mut document = self.to_payload();
        merge_patch(&mut document, patch);

        Self::from_payload(self.kind, document, Some(&self.name))
    }
}

/// Media tree the provisioning server populated from an installation ISO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedMedia {
    pub basename: String,
    pub arch: String,
    /// Where the tree landed, e.g. `/install/rhels8.4/x86_64`.
    pub directory: String,
}

impl CopiedMedia {
    /// Name the provisioning server gives the distro, e.g. `rhels8.4-x86_64`.
    pub fn distro_name(&self) -> String {
        format!("{}-{}", self.basename, self.arch)
    }

    /// `osdistro` document for a distro holding only this tree.
    pub fn distro_payload(&self) -> Value {
        json!({
            "meta": { "name": self.distro_name() },
            "spec": {
                "basename": self.basename,
                "arch": self.arch,
                "dirpaths": [self.directory],
            }
        })
    }
}

fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }

    if let Value::Object(target) = target {
        for (key, value) in patch {
            if value.is_null() {
                target.remove(key);
            } else {
                merge_patch(target.entry(key.as_str()).or_insert(Value::Null), value);
            }
        }
    }
}
