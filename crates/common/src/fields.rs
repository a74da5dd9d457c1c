//! Protocol field tree
//!
//! A protocol is an ordered list of named fields. A field is either a leaf
//! holding one editable value, or a group holding an ordered list of leaves.
//! Groups never contain groups.
//!
//! On the wire both shapes share one object layout:
//!
//! ```text
//! { "name": "Insulation Resistance", "value": "" }
//! { "name": "Winding Resistance", "type": "group",
//!   "fields": [ { "name": "U-V", "value": "" }, ... ] }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

const GROUP_TYPE: &str = "group";

/// Single editable datum
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeafField {
    pub name: String,
    /// Non-group `type` hint from the backend, kept as-is
    pub kind: Option<String>,
    pub value: String,
}

impl LeafField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            value: value.into(),
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    fn set(&mut self, key: FieldKey, value: String) {
        match key {
            FieldKey::Name => self.name = value,
            FieldKey::Value => self.value = value,
        }
    }
}

/// Named group of leaves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupField {
    pub name: String,
    pub fields: Vec<LeafField>,
}

impl GroupField {
    pub fn new(name: impl Into<String>, fields: Vec<LeafField>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// One top-level node of the protocol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireField", into = "WireField")]
pub enum ProtocolField {
    Leaf(LeafField),
    Group(GroupField),
}

impl ProtocolField {
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        ProtocolField::Leaf(LeafField::new(name, value))
    }

    pub fn group(name: impl Into<String>, fields: Vec<LeafField>) -> Self {
        ProtocolField::Group(GroupField::new(name, fields))
    }

    pub fn name(&self) -> &str {
        match self {
            ProtocolField::Leaf(leaf) => &leaf.name,
            ProtocolField::Group(group) => &group.name,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ProtocolField::Group(_))
    }
}

/// Object layout shared by leaves and groups on the wire
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireField {
    name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<WireField>>,
}

impl WireField {
    fn is_group(&self) -> bool {
        self.kind.as_deref() == Some(GROUP_TYPE)
    }

    /// Anything not typed `group` is a leaf; stray `fields` are dropped.
    fn into_leaf(self) -> LeafField {
        if self.fields.is_some() {
            warn!(field = %self.name, "Ignoring sub-fields on a non-group field");
        }
        LeafField {
            name: self.name,
            kind: self.kind,
            value: self.value.unwrap_or_default(),
        }
    }
}

impl TryFrom<WireField> for ProtocolField {
    type Error = String;

    fn try_from(wire: WireField) -> Result<Self, Self::Error> {
        if !wire.is_group() {
            return Ok(ProtocolField::Leaf(wire.into_leaf()));
        }

        let name = wire.name;
        let fields = wire
            .fields
            .unwrap_or_default()
            .into_iter()
            .map(|sub| {
                if sub.is_group() {
                    Err(format!("group '{}' nests group '{}'", name, sub.name))
                } else {
                    Ok(sub.into_leaf())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProtocolField::Group(GroupField { name, fields }))
    }
}

impl From<LeafField> for WireField {
    fn from(leaf: LeafField) -> Self {
        WireField {
            name: leaf.name,
            kind: leaf.kind,
            value: Some(leaf.value),
            fields: None,
        }
    }
}

impl From<ProtocolField> for WireField {
    fn from(field: ProtocolField) -> Self {
        match field {
            ProtocolField::Leaf(leaf) => leaf.into(),
            ProtocolField::Group(group) => WireField {
                name: group.name,
                kind: Some(GROUP_TYPE.to_string()),
                value: None,
                fields: Some(group.fields.into_iter().map(WireField::from).collect()),
            },
        }
    }
}

/// Attribute targeted by a field update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey {
    Name,
    Value,
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name => write!(f, "name"),
            FieldKey::Value => write!(f, "value"),
        }
    }
}

impl FromStr for FieldKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(FieldKey::Name),
            "value" => Ok(FieldKey::Value),
            other => Err(format!("unknown field attribute '{}'", other)),
        }
    }
}

/// Editable protocol field list for one template/motor-type pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtocolFieldTree {
    fields: Vec<ProtocolField>,
}

impl ProtocolFieldTree {
    pub fn new(fields: Vec<ProtocolField>) -> Self {
        Self { fields }
    }

    /// Replace the whole tree; nothing from the previous tree is kept.
    pub fn replace(&mut self, fields: Vec<ProtocolField>) {
        self.fields = fields;
    }

    pub fn fields(&self) -> &[ProtocolField] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&ProtocolField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Set `key` on the field named `field_name`.
    ///
    /// For a group with a valid `sub_index` the sub-field at that position is
    /// updated. Otherwise the node's own attribute is updated; a group has no
    /// value of its own, so a `Value` update without a valid index changes
    /// nothing, while a `Name` update without one renames the group itself.
    ///
    /// Every top-level node with a matching name is updated. Returns `false`
    /// when nothing changed, including when no field has that name.
    pub fn apply(
        &mut self,
        field_name: &str,
        sub_index: Option<usize>,
        key: FieldKey,
        value: impl Into<String>,
    ) -> bool {
        let value = value.into();
        let mut applied = false;

        for field in self.fields.iter_mut().filter(|f| f.name() == field_name) {
            applied |= match field {
                ProtocolField::Leaf(leaf) => {
                    leaf.set(key, value.clone());
                    true
                }
                ProtocolField::Group(group) => {
                    match sub_index.and_then(|index| group.fields.get_mut(index)) {
                        Some(sub) => {
                            sub.set(key, value.clone());
                            true
                        }
                        None if key == FieldKey::Name => {
                            group.name = value.clone();
                            true
                        }
                        None => {
                            warn!(
                                field = field_name,
                                sub_index = ?sub_index,
                                "Group value update without a valid sub-field index"
                            );
                            false
                        }
                    }
                }
            };
        }

        if !applied {
            debug!(field = field_name, key = %key, "Protocol field update matched nothing");
        }
        applied
    }
}

impl From<Vec<ProtocolField>> for ProtocolFieldTree {
    fn from(fields: Vec<ProtocolField>) -> Self {
        Self::new(fields)
    }
}
