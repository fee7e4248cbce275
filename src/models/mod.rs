mod book;
mod recommendation;

pub use book::{Book, BookId, ReadingState};
pub use recommendation::{ScoredCandidate, ShelfLocation, ThemeVisual};
