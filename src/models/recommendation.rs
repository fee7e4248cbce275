use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::Book;

/// Conceptual distance between a candidate and the user's highly rated books
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShelfLocation {
    #[serde(rename = "One shelf over, similar voice")]
    OneShelfOverSimilarVoice,
    #[serde(rename = "Adjacent shelf")]
    AdjacentShelf,
    #[serde(rename = "Nearby shelf, kindred spirit")]
    NearbyShelfKindredSpirit,
    #[serde(rename = "Nearby shelf")]
    NearbyShelf,
    #[serde(rename = "Same aisle, different perspective")]
    SameAisle,
    #[serde(rename = "Different section, similar voice")]
    DifferentSectionSimilarVoice,
    #[serde(rename = "Worth exploring")]
    WorthExploring,
}

impl ShelfLocation {
    /// Picks the location from the number of distinct matched themes and the style subtotal.
    /// Rows are checked in order and the first match wins.
    pub fn from_match(theme_count: usize, style_score: f64) -> Self {
        match theme_count {
            1 if style_score > 20.0 => ShelfLocation::OneShelfOverSimilarVoice,
            1 => ShelfLocation::AdjacentShelf,
            2 if style_score > 15.0 => ShelfLocation::NearbyShelfKindredSpirit,
            2 => ShelfLocation::NearbyShelf,
            3 => ShelfLocation::SameAisle,
            _ if style_score > 25.0 => ShelfLocation::DifferentSectionSimilarVoice,
            _ => ShelfLocation::WorthExploring,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ShelfLocation::OneShelfOverSimilarVoice => "One shelf over, similar voice",
            ShelfLocation::AdjacentShelf => "Adjacent shelf",
            ShelfLocation::NearbyShelfKindredSpirit => "Nearby shelf, kindred spirit",
            ShelfLocation::NearbyShelf => "Nearby shelf",
            ShelfLocation::SameAisle => "Same aisle, different perspective",
            ShelfLocation::DifferentSectionSimilarVoice => "Different section, similar voice",
            ShelfLocation::WorthExploring => "Worth exploring",
        }
    }
}

impl Display for ShelfLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An unread book scored against the user's highly rated books.
///
/// Produced fresh on every recommendation pass and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<'a> {
    pub book: &'a Book,
    pub shelf_score: f64,
    /// Style subtotal included in `shelf_score`
    pub style_score: f64,
    /// Distinct shared themes in first-seen order
    pub matched_themes: Vec<String>,
    pub shelf_location: ShelfLocation,
    pub recommendation_reason: String,
}

/// Display attributes for a theme tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeVisual {
    pub icon: String,
    pub color: String,
}
