//! Store behavior options

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What `add_item` does when the identifier is already present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Fail with `DuplicateId`, leaving the store unchanged
    #[default]
    Reject,
    /// Overwrite the existing item in its current slot
    Replace,
}

/// What `update_item` does once the target has been located
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateMode {
    /// Overwrite the stored item, keeping its position
    #[default]
    Replace,
    /// Validate and locate only; the stored item is left untouched
    ValidateOnly,
}

/// Visiting order for descendant enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalOrder {
    /// Explicit LIFO stack seeded with the direct children: the last-listed
    /// child of every node is visited first
    #[default]
    Stack,
    /// Depth-first pre-order, first-listed child first
    PreOrder,
}

/// Options controlling how a [`TreeStore`](crate::TreeStore) validates mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StoreOptions {
    #[serde(default)]
    pub duplicates: DuplicatePolicy,

    #[serde(default)]
    pub update: UpdateMode,

    /// Refuse inserts and updates that close a parent cycle
    #[serde(default = "default_reject_cycles")]
    pub reject_cycles: bool,
}

fn default_reject_cycles() -> bool {
    true
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            update: UpdateMode::default(),
            reject_cycles: default_reject_cycles(),
        }
    }
}

impl StoreOptions {
    /// Accept anything: duplicates replace, cycles are tolerated
    pub fn lenient() -> Self {
        Self {
            duplicates: DuplicatePolicy::Replace,
            update: UpdateMode::Replace,
            reject_cycles: false,
        }
    }

    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    pub fn with_update(mut self, mode: UpdateMode) -> Self {
        self.update = mode;
        self
    }

    pub fn with_reject_cycles(mut self, reject: bool) -> Self {
        self.reject_cycles = reject;
        self
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Replace => write!(f, "replace"),
        }
    }
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "replace" => Ok(Self::Replace),
            other => Err(format!("invalid value '{}', expected reject or replace", other)),
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace => write!(f, "replace"),
            Self::ValidateOnly => write!(f, "validate-only"),
        }
    }
}

impl FromStr for UpdateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "validate-only" => Ok(Self::ValidateOnly),
            other => Err(format!(
                "invalid value '{}', expected replace or validate-only",
                other
            )),
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stack => write!(f, "stack"),
            Self::PreOrder => write!(f, "pre-order"),
        }
    }
}

impl FromStr for TraversalOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stack" => Ok(Self::Stack),
            "pre-order" => Ok(Self::PreOrder),
            other => Err(format!("invalid value '{}', expected stack or pre-order", other)),
        }
    }
}
