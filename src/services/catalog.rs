//! Catalog loading
//!
//! The catalog is a JSON array of books. It can live on disk or behind an HTTP endpoint;
//! both sources go through the same validation before the library is built from them.
use std::collections::HashSet;
use std::path::PathBuf;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::Book,
};

/// Trait for catalog sources
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetches and validates the full catalog
    async fn load(&self) -> AppResult<Vec<Book>>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}

/// Picks the source for a configured location: http(s) URLs are fetched, anything else is a
/// file path
pub fn catalog_source(location: &str) -> Box<dyn CatalogSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpCatalog::new(location.to_string()))
    } else {
        Box::new(FileCatalog::new(location))
    }
}

/// Catalog stored as a JSON file
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl CatalogSource for FileCatalog {
    async fn load(&self) -> AppResult<Vec<Book>> {
        tracing::debug!(path = %self.path.display(), "Reading catalog file");

        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::Catalog(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let books = parse_catalog(&raw)?;
        tracing::info!(path = %self.path.display(), book_count = books.len(), "Catalog loaded");
        Ok(books)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Catalog served over HTTP
pub struct HttpCatalog {
    http_client: HttpClient,
    url: String,
}

impl HttpCatalog {
    pub fn new(url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            url,
        }
    }
}

#[async_trait::async_trait]
impl CatalogSource for HttpCatalog {
    async fn load(&self) -> AppResult<Vec<Book>> {
        tracing::debug!(url = %self.url, "Fetching catalog");

        let response = self.http_client.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                url = %self.url,
                status = %status,
                body = %body,
                "Catalog request failed"
            );
            return Err(AppError::Catalog(format!(
                "Catalog endpoint returned status {}: {}",
                status, body
            )));
        }

        let raw = response.text().await?;
        let books = parse_catalog(&raw)?;
        tracing::info!(url = %self.url, book_count = books.len(), "Catalog loaded");
        Ok(books)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Parses a catalog document and rejects duplicate ids
pub fn parse_catalog(raw: &str) -> AppResult<Vec<Book>> {
    let books: Vec<Book> = serde_json::from_str(raw)
        .map_err(|e| AppError::Catalog(format!("Invalid catalog JSON: {}", e)))?;

    let mut seen = HashSet::new();
    for book in &books {
        if !seen.insert(book.id) {
            return Err(AppError::Catalog(format!("Duplicate book id {}", book.id)));
        }
        if book.themes.is_empty() {
            tracing::warn!(book_id = %book.id, title = %book.title, "Book has no themes");
        }
    }

    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookId;

    const CATALOG: &str = r#"[
        {"id": 1, "title": "1984", "author": "George Orwell", "year": 1949,
         "writingStyle": "stark", "themes": ["surveillance"]},
        {"id": 2, "title": "Brave New World", "author": "Aldous Huxley", "year": 1932,
         "writingStyle": "satirical", "themes": ["conditioning"], "read": true, "rating": 5}
    ]"#;

    #[test]
    fn test_parse_catalog() {
        let books = parse_catalog(CATALOG).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[1].id, BookId(2));
        assert_eq!(books[1].rating, 5);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let raw = r#"[
            {"id": 1, "title": "A", "author": "X", "year": 1900},
            {"id": 1, "title": "B", "author": "Y", "year": 1901}
        ]"#;
        let err = parse_catalog(raw).unwrap_err();
        assert!(matches!(err, AppError::Catalog(msg) if msg.contains("Duplicate book id 1")));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            parse_catalog("{not json"),
            Err(AppError::Catalog(_))
        ));
    }

    #[test]
    fn test_source_selection() {
        assert_eq!(catalog_source("https://example.com/books.json").name(), "http");
        assert_eq!(catalog_source("http://localhost/books.json").name(), "http");
        assert_eq!(catalog_source("data/books.json").name(), "file");
    }

    #[tokio::test]
    async fn test_file_catalog_loads() {
        let path = std::env::temp_dir().join(format!("shelf-over-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, CATALOG).await.unwrap();

        let books = FileCatalog::new(&path).load().await.unwrap();
        assert_eq!(books.len(), 2);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_catalog_error() {
        let result = FileCatalog::new("/nonexistent/shelf-over/books.json").load().await;
        assert!(matches!(result, Err(AppError::Catalog(_))));
    }

    #[tokio::test]
    async fn test_bundled_catalog_is_valid() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/books.json");
        let books = FileCatalog::new(path).load().await.unwrap();
        assert!(!books.is_empty());
        assert!(books.iter().all(|b| !b.themes.is_empty()));
    }
}
