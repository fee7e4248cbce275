use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookId, ReadingState},
};

/// Read-status filter
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Read,
    Unread,
}

/// Publication era buckets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Era {
    /// Before 1980
    Classic,
    /// 1980 to 1999
    Modern,
    /// 2000 onwards
    Contemporary,
}

impl Era {
    pub fn contains(&self, year: i32) -> bool {
        match self {
            Era::Classic => year < 1980,
            Era::Modern => (1980..2000).contains(&year),
            Era::Contemporary => year >= 2000,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Title,
    Author,
    YearAsc,
    YearDesc,
    RatingDesc,
    RatingAsc,
}

/// Filter and sort options for browsing the library
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookQuery {
    /// Case-insensitive match on title, author, description or any theme
    pub search: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
    pub min_rating: Option<u8>,
    pub era: Option<Era>,
    /// Case-insensitive substring of any theme
    pub theme: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
}

/// Reading progress summary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    pub books_read: usize,
    pub total_books: usize,
    /// Mean rating over read and rated books, one decimal place
    pub average_rating: f64,
}

/// The book collection with the user's reading state merged in
#[derive(Debug, Clone, Default)]
pub struct Library {
    books: Vec<Book>,
}

impl Library {
    /// Builds the library from catalog entries and stored reading state.
    ///
    /// Stored state overrides whatever the catalog carries. State for ids missing from the
    /// catalog is ignored.
    pub fn from_catalog(mut books: Vec<Book>, mut states: HashMap<BookId, ReadingState>) -> Self {
        for book in books.iter_mut() {
            if let Some(state) = states.remove(&book.id) {
                book.apply_state(state);
            }
        }

        if !states.is_empty() {
            tracing::debug!(
                orphaned = states.len(),
                "Ignoring reading state for books missing from the catalog"
            );
        }

        Self { books }
    }

    /// All books in catalog order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    fn get_mut(&mut self, id: BookId) -> AppResult<&mut Book> {
        self.books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    fn current_state(&self, id: BookId) -> AppResult<ReadingState> {
        self.get(id)
            .map(Book::reading_state)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// State a book moves to when marked read or unread. The rating is kept.
    pub fn read_update(&self, id: BookId, read: bool) -> AppResult<ReadingState> {
        let current = self.current_state(id)?;
        Ok(ReadingState { read, ..current })
    }

    /// State a book moves to when rated. Ratings run from 1 to 5 and also mark the book read.
    pub fn rating_update(&self, id: BookId, rating: i64) -> AppResult<ReadingState> {
        let rating = u8::try_from(rating)
            .ok()
            .filter(|r| (1..=5).contains(r))
            .ok_or_else(|| {
                AppError::InvalidInput(format!("Rating must be between 1 and 5, got {}", rating))
            })?;

        self.current_state(id)?;
        Ok(ReadingState { read: true, rating })
    }

    /// Commits a reading state, normally one produced by [`Library::read_update`] or
    /// [`Library::rating_update`] that has already been persisted
    pub fn apply(&mut self, id: BookId, state: ReadingState) -> AppResult<&Book> {
        let book = self.get_mut(id)?;
        book.apply_state(state);
        Ok(book)
    }

    /// Resets every book to unread and unrated
    pub fn clear_reading_data(&mut self) {
        for book in self.books.iter_mut() {
            book.apply_state(ReadingState::default());
        }
    }

    pub fn stats(&self) -> LibraryStats {
        let read: Vec<&Book> = self.books.iter().filter(|b| b.read).collect();
        let ratings: Vec<f64> = read
            .iter()
            .filter(|b| b.rating > 0)
            .map(|b| f64::from(b.rating))
            .collect();

        let average_rating = if ratings.is_empty() {
            0.0
        } else {
            let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
            (mean * 10.0).round() / 10.0
        };

        LibraryStats {
            books_read: read.len(),
            total_books: self.books.len(),
            average_rating,
        }
    }

    /// Filters then sorts the library. Ties keep catalog order.
    pub fn query(&self, query: &BookQuery) -> Vec<&Book> {
        let search = query
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let theme = query.theme.as_deref().map(str::to_lowercase);

        let mut books: Vec<&Book> = self
            .books
            .iter()
            .filter(|b| search.as_deref().map_or(true, |term| matches_search(b, term)))
            .filter(|b| match query.status {
                StatusFilter::All => true,
                StatusFilter::Read => b.read,
                StatusFilter::Unread => !b.read,
            })
            .filter(|b| query.min_rating.map_or(true, |min| b.rating >= min))
            .filter(|b| query.era.map_or(true, |era| era.contains(b.year)))
            .filter(|b| {
                theme.as_deref().map_or(true, |wanted| {
                    b.themes.iter().any(|t| t.to_lowercase().contains(wanted))
                })
            })
            .collect();

        match query.sort {
            SortOrder::Title => books.sort_by_key(|b| b.title.to_lowercase()),
            SortOrder::Author => books.sort_by_key(|b| b.author.to_lowercase()),
            SortOrder::YearAsc => books.sort_by_key(|b| b.year),
            SortOrder::YearDesc => books.sort_by_key(|b| std::cmp::Reverse(b.year)),
            SortOrder::RatingDesc => books.sort_by_key(|b| std::cmp::Reverse(b.rating)),
            SortOrder::RatingAsc => books.sort_by_key(|b| b.rating),
        }

        books
    }
}

fn matches_search(book: &Book, term: &str) -> bool {
    book.title.to_lowercase().contains(term)
        || book.author.to_lowercase().contains(term)
        || book.description.to_lowercase().contains(term)
        || book.themes.iter().any(|t| t.to_lowercase().contains(term))
}
