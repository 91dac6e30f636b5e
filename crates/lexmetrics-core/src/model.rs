//! Core data model types for lexmetrics.
//!
//! Resources arrive from an external store with a type tag and a free-form
//! JSON content body. Everything the engine computes is derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stored educational resource handed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique identifier assigned by the resource store.
    pub id: String,
    /// Which kind of material this is; decides how `content` is read.
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// Identifier of the owning user.
    #[serde(default, alias = "ownerId", alias = "owner_id")]
    pub owner: Option<String>,
    /// Optional display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Type-dependent content body. `None` when the store holds `null`.
    #[serde(default)]
    pub content: Option<serde_json::Value>,
}

/// Kinds of educational resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ResourceType {
    Comprension,
    Escritura,
    Gramatica,
    Oral,
    DragAndDrop,
    IceBreakers,
    /// Any type the engine has no dedicated handling for, kept verbatim.
    Other(String),
}

impl ResourceType {
    pub fn as_str(&self) -> &str {
        match self {
            ResourceType::Comprension => "comprension",
            ResourceType::Escritura => "escritura",
            ResourceType::Gramatica => "gramatica",
            ResourceType::Oral => "oral",
            ResourceType::DragAndDrop => "drag_and_drop",
            ResourceType::IceBreakers => "ice_breakers",
            ResourceType::Other(name) => name,
        }
    }

    /// Returns `true` for the types with a registered text extractor by default.
    pub fn is_known(&self) -> bool {
        !matches!(self, ResourceType::Other(_))
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        if normalized.is_empty() {
            return Err("resource type must not be empty".to_string());
        }
        Ok(match normalized.as_str() {
            "comprension" | "comprensión" | "reading" => ResourceType::Comprension,
            "escritura" | "writing" => ResourceType::Escritura,
            "gramatica" | "gramática" | "grammar" => ResourceType::Gramatica,
            "oral" | "speaking" => ResourceType::Oral,
            "drag_and_drop" | "draganddrop" => ResourceType::DragAndDrop,
            "ice_breakers" | "icebreakers" => ResourceType::IceBreakers,
            _ => ResourceType::Other(s.to_string()),
        })
    }
}

impl TryFrom<String> for ResourceType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ResourceType> for String {
    fn from(value: ResourceType) -> Self {
        value.as_str().to_string()
    }
}

/// Selects the batch input set. All criteria are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceFilter {
    /// Keep only resources of this type.
    #[serde(default, rename = "type")]
    pub resource_type: Option<ResourceType>,
    /// Keep only resources owned by this user.
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Maximum number of matches to keep (before the batch cap).
    #[serde(default)]
    pub limit: Option<usize>,
    /// Number of matches to skip.
    #[serde(default)]
    pub offset: Option<usize>,
}

impl ResourceFilter {
    pub fn by_type(resource_type: ResourceType) -> Self {
        Self {
            resource_type: Some(resource_type),
            ..Default::default()
        }
    }

    pub fn by_owner(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            ..Default::default()
        }
    }

    /// Whether a resource passes the type and owner criteria.
    pub fn matches(&self, resource: &Resource) -> bool {
        let type_ok = self
            .resource_type
            .as_ref()
            .map_or(true, |t| *t == resource.resource_type);
        let owner_ok = self
            .owner_id
            .as_ref()
            .map_or(true, |o| resource.owner.as_deref() == Some(o.as_str()));
        type_ok && owner_ok
    }

    /// Apply type/owner criteria, then offset and limit, preserving input order.
    pub fn apply<'a>(&self, resources: &'a [Resource]) -> Vec<&'a Resource> {
        resources
            .iter()
            .filter(|r| self.matches(r))
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

/// Where in a resource a text unit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Passage,
    Question,
    Option,
    Answer,
    Prompt,
    Instructions,
    Example,
    GrammarItem,
    DialogueLine,
    Script,
    Item,
    Activity,
}

impl UnitKind {
    /// Short answer-like units that are not expected to be full sentences.
    pub fn is_fragment(&self) -> bool {
        matches!(self, UnitKind::Option | UnitKind::Answer | UnitKind::Item)
    }
}

/// A single readable string extracted from a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextUnit {
    pub kind: UnitKind,
    pub text: String,
}

impl TextUnit {
    pub fn new(kind: UnitKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}
