//! Item (record) types and the trait the store reads them through

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::convert::Infallible;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

/// Identifier of an item, either an integer or a string
///
/// `Int(1)` and `Str("1")` are distinct identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Text that parses as an `i64` becomes `Int`, anything else `Str`
impl FromStr for ItemId {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(Self::Int)
            .unwrap_or_else(|_| Self::Str(s.to_string())))
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Access to the two fields the store cares about
///
/// Any record type can be indexed by a [`TreeStore`](crate::TreeStore) as
/// long as it can report its own identifier and its parent's identifier.
pub trait TreeItem {
    type Id: Clone + Eq + Hash + Debug + Display;

    /// Identifier of this item. `None` marks an invalid item.
    fn id(&self) -> Option<&Self::Id>;

    /// Identifier of the parent item. `None` marks a root.
    fn parent(&self) -> Option<&Self::Id>;
}

/// A generic record with an id, an optional parent and arbitrary extra fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: Option<ItemId>,

    #[serde(default)]
    pub parent: Option<ItemId>,

    /// All remaining fields, kept as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, parent: Option<ItemId>) -> Self {
        Self {
            id: Some(id.into()),
            parent,
            extra: Map::new(),
        }
    }

    /// Create an item without a parent
    pub fn root(id: impl Into<ItemId>) -> Self {
        Self::new(id, None)
    }

    /// Create an item under `parent`
    pub fn child(id: impl Into<ItemId>, parent: impl Into<ItemId>) -> Self {
        Self::new(id, Some(parent.into()))
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Parse a single item. A JSON `null` is rejected as an invalid item.
    pub fn from_json(json: &str) -> Result<Self> {
        let item: Option<Item> = serde_json::from_str(json)?;
        item.ok_or_else(|| Error::InvalidItem("item is null".to_string()))
    }

    /// Parse a JSON array of items
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}

impl TreeItem for Item {
    type Id = ItemId;

    fn id(&self) -> Option<&ItemId> {
        self.id.as_ref()
    }

    fn parent(&self) -> Option<&ItemId> {
        self.parent.as_ref()
    }
}
