use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Stable catalog identifier of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub u32);

impl Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowest rating that seeds recommendations
pub const HIGHLY_RATED_MIN: u8 = 4;

/// Per-book user state, persisted keyed by book id
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadingState {
    #[serde(default)]
    pub read: bool,
    /// 0 means unrated
    #[serde(default)]
    pub rating: u8,
}

/// A catalog entry with the user's reading state merged in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language: Option<String>,
    /// Free-text descriptor such as "sparse, clinical prose"
    #[serde(default)]
    pub writing_style: String,
    /// Ordered by authorial emphasis
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub rating: u8,
}

impl Book {
    /// Current reading state of this book
    pub fn reading_state(&self) -> ReadingState {
        ReadingState {
            read: self.read,
            rating: self.rating,
        }
    }

    /// Overwrites the mutable user fields
    pub fn apply_state(&mut self, state: ReadingState) {
        self.read = state.read;
        self.rating = state.rating;
    }

    pub fn is_highly_rated(&self) -> bool {
        self.rating >= HIGHLY_RATED_MIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_id_display() {
        assert_eq!(format!("{}", BookId(42)), "42");
    }

    #[test]
    fn test_deserialize_catalog_entry_with_defaults() {
        let json = r#"{
            "id": 1,
            "title": "1984",
            "author": "George Orwell",
            "year": 1949,
            "description": "Big Brother is watching.",
            "writingStyle": "stark, bleak prose",
            "themes": ["surveillance", "totalitarianism"]
        }"#;

        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.id, BookId(1));
        assert_eq!(book.writing_style, "stark, bleak prose");
        assert_eq!(book.themes, vec!["surveillance", "totalitarianism"]);
        assert!(!book.read);
        assert_eq!(book.rating, 0);
        assert_eq!(book.language, None);
    }

    #[test]
    fn test_missing_style_and_themes_are_empty() {
        let json = r#"{"id": 2, "title": "T", "author": "A", "year": 2000}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert!(book.writing_style.is_empty());
        assert!(book.themes.is_empty());
    }

    #[test]
    fn test_reading_state_serialization() {
        let state = ReadingState {
            read: true,
            rating: 4,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"read":true,"rating":4}"#);

        let empty: ReadingState = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, ReadingState::default());
    }

    #[test]
    fn test_apply_state() {
        let mut book: Book =
            serde_json::from_str(r#"{"id": 3, "title": "T", "author": "A", "year": 1990}"#).unwrap();
        book.apply_state(ReadingState {
            read: true,
            rating: 5,
        });
        assert!(book.read);
        assert!(book.is_highly_rated());
        assert_eq!(book.reading_state().rating, 5);
    }
}
