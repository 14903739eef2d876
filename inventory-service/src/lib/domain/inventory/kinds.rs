use std::fmt;

use serde_json::Map;
use serde_json::Value;

use super::errors::ResourceValidationError;

/// JSON shape an attribute must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Array,
    Object,
    Number,
    Bool,
}

impl FieldKind {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Array => value.is_array(),
            FieldKind::Object => value.is_object(),
            FieldKind::Number => value.is_number(),
            FieldKind::Bool => value.is_boolean(),
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            FieldKind::String => "a string",
            FieldKind::Array => "an array",
            FieldKind::Object => "an object",
            FieldKind::Number => "a number",
            FieldKind::Bool => "a boolean",
        }
    }
}

/// Validation rule for one `spec` attribute.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Descriptor for an inventory resource type.
///
/// Everything type-specific about a resource lives here, so services and
/// handlers stay generic. Attributes without a rule are accepted as-is.
#[derive(Debug)]
pub struct ResourceKind {
    /// Key used by the inventory store, e.g. `osimage`.
    pub type_name: &'static str,
    /// Human-readable label for messages, e.g. `OSimage`.
    pub label: &'static str,
    pub fields: &'static [FieldRule],
}

impl ResourceKind {
    /// Check `spec` against this kind's field rules.
    ///
    /// # Errors
    /// * `MissingField` - A required attribute is absent or null
    /// * `WrongType` - An attribute has the wrong JSON type
    pub fn validate_spec(&self, spec: &Map<String, Value>) -> Result<(), ResourceValidationError> {
        for rule in self.fields {
            match spec.get(rule.name) {
                None | Some(Value::Null) if rule.required => {
                    return Err(ResourceValidationError::MissingField {
                        kind: self.type_name,
                        field: rule.name,
                    });
                }
                Some(value) if !value.is_null() && !rule.kind.matches(value) => {
                    return Err(ResourceValidationError::WrongType {
                        field: rule.name,
                        expected: rule.kind.describe(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn from_type_name(type_name: &str) -> Option<&'static ResourceKind> {
        ALL_KINDS
            .iter()
            .copied()
            .find(|kind| kind.type_name == type_name)
    }
}

impl PartialEq for ResourceKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
    }
}

impl Eq for ResourceKind {}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

pub static OSIMAGE: ResourceKind = ResourceKind {
    type_name: "osimage",
    label: "OSimage",
    fields: &[
        FieldRule::required("imagetype", FieldKind::String),
        FieldRule::required("provmethod", FieldKind::String),
        FieldRule::optional("osname", FieldKind::String),
        FieldRule::optional("osvers", FieldKind::String),
        FieldRule::optional("osarch", FieldKind::String),
        FieldRule::optional("profile", FieldKind::String),
        FieldRule::optional("pkglist", FieldKind::Array),
        FieldRule::optional("otherpkglist", FieldKind::Array),
    ],
};

pub static OSDISTRO: ResourceKind = ResourceKind {
    type_name: "osdistro",
    label: "Distro",
    fields: &[
        FieldRule::required("basename", FieldKind::String),
        FieldRule::required("arch", FieldKind::String),
        FieldRule::optional("majorversion", FieldKind::String),
        FieldRule::optional("minorversion", FieldKind::String),
        FieldRule::optional("type", FieldKind::String),
        FieldRule::optional("dirpaths", FieldKind::Array),
    ],
};

pub static ALL_KINDS: [&ResourceKind; 2] = [&OSIMAGE, &OSDISTRO];
