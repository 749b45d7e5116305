//! Basic Identifier Types
//!
//! Naming conventions:
//! - `_id` suffix: primary key identifiers
//! - newtypes are non-interchangeable; a `TargetId` never passes where a
//!   `GroupId` is expected

use serde::{Deserialize, Serialize};

/// Target group ID
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh group ID
    pub fn generate() -> Self {
        Self(format!("group:{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Protected target reference (host-supplied, e.g. a bundle identifier or
/// platform category token). The engine treats it as opaque.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Energy drop ID
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DropId(pub String);

impl DropId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh drop ID
    pub fn generate() -> Self {
        Self(format!("drop:{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DropId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Credit accrual source category.
///
/// Categories exist for per-category daily maxima and presentation
/// breakdowns; credits themselves are fungible once earned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Step count reported by the activity source
    Steps,
    /// Sleep hours reported by the activity source
    Sleep,
    /// User-chosen wellbeing actions
    Wellbeing,
    /// Collectible drop bonuses
    OuterWorld,
}

impl Category {
    /// Get category name for logging and storage keys
    pub fn name(&self) -> &'static str {
        match self {
            Category::Steps => "steps",
            Category::Sleep => "sleep",
            Category::Wellbeing => "wellbeing",
            Category::OuterWorld => "outer_world",
        }
    }

    /// All categories
    pub fn all() -> [Category; 4] {
        [
            Category::Steps,
            Category::Sleep,
            Category::Wellbeing,
            Category::OuterWorld,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
