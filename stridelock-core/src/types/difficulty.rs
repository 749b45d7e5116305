//! Difficulty Levels
//!
//! Per-group cost multiplier tiers, 1 (cheapest) through 5 (most expensive).
//! Display labels live here, never inside the cost logic; the cost model only
//! consumes the numeric level.

use serde::{Deserialize, Serialize};

/// Per-group cost multiplier tier
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Casual,
    Light,
    Balanced,
    Strict,
    Hardcore,
}

impl DifficultyLevel {
    /// Numeric level, 1..=5
    pub fn level(&self) -> u8 {
        match self {
            DifficultyLevel::Casual => 1,
            DifficultyLevel::Light => 2,
            DifficultyLevel::Balanced => 3,
            DifficultyLevel::Strict => 4,
            DifficultyLevel::Hardcore => 5,
        }
    }

    /// Parse a numeric level
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(DifficultyLevel::Casual),
            2 => Some(DifficultyLevel::Light),
            3 => Some(DifficultyLevel::Balanced),
            4 => Some(DifficultyLevel::Strict),
            5 => Some(DifficultyLevel::Hardcore),
            _ => None,
        }
    }

    /// Display label for settings screens
    pub fn label(&self) -> &'static str {
        match self {
            DifficultyLevel::Casual => "Casual",
            DifficultyLevel::Light => "Light",
            DifficultyLevel::Balanced => "Balanced",
            DifficultyLevel::Strict => "Strict",
            DifficultyLevel::Hardcore => "Hardcore",
        }
    }

    /// All tiers, cheapest first
    pub fn all() -> [DifficultyLevel; 5] {
        [
            DifficultyLevel::Casual,
            DifficultyLevel::Light,
            DifficultyLevel::Balanced,
            DifficultyLevel::Strict,
            DifficultyLevel::Hardcore,
        ]
    }
}

impl Default for DifficultyLevel {
    fn default() -> Self {
        Self::Balanced
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_roundtrip() {
        for tier in DifficultyLevel::all() {
            assert_eq!(DifficultyLevel::from_level(tier.level()), Some(tier));
        }
        assert_eq!(DifficultyLevel::from_level(0), None);
        assert_eq!(DifficultyLevel::from_level(6), None);
    }

    #[test]
    fn test_tier_order_is_level_order() {
        let tiers = DifficultyLevel::all();
        for pair in tiers.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].level() < pair[1].level());
        }
    }
}
