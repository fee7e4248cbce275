use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{Book, BookId, ScoredCandidate, ShelfLocation};
use crate::services::{BookQuery, LibraryStats, Recommender, ThemeVisuals};

use super::AppState;

/// Matched themes shown per recommendation
const DISPLAYED_THEMES: usize = 4;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SetReadRequest {
    pub read: bool,
}

#[derive(Debug, Deserialize)]
pub struct SetRatingRequest {
    /// Range-checked by the library so out-of-range values get a JSON 400
    pub rating: i64,
}

#[derive(Debug, Serialize)]
pub struct MatchedThemeResponse {
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i32,
    pub writing_style: String,
    pub shelf_score: f64,
    pub shelf_location: ShelfLocation,
    pub recommendation_reason: String,
    pub matched_themes: Vec<MatchedThemeResponse>,
}

impl RecommendationResponse {
    fn from_candidate(candidate: &ScoredCandidate<'_>, visuals: &ThemeVisuals) -> Self {
        let book = candidate.book;
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
            writing_style: book.writing_style.clone(),
            shelf_score: candidate.shelf_score,
            shelf_location: candidate.shelf_location,
            recommendation_reason: candidate.recommendation_reason.clone(),
            matched_themes: candidate
                .matched_themes
                .iter()
                .take(DISPLAYED_THEMES)
                .map(|theme| {
                    let visual = visuals.lookup(theme);
                    MatchedThemeResponse {
                        name: theme.clone(),
                        icon: visual.icon.clone(),
                        color: visual.color.clone(),
                    }
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendationResponse>,
    /// Titles of the highly rated books the list was seeded from
    pub based_on: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// List books, filtered and sorted by the query string
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Json<Vec<Book>> {
    let library = state.library.read().await;
    let books = library.query(&query).into_iter().cloned().collect();
    Json(books)
}

/// Get a single book
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<Book>> {
    let library = state.library.read().await;
    library
        .get(BookId(id))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
}

/// Mark a book read or unread. The library only changes once the store accepted the write.
pub async fn set_read(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<u32>,
    Json(request): Json<SetReadRequest>,
) -> AppResult<Json<Book>> {
    let id = BookId(id);
    let mut library = state.library.write().await;
    let reading_state = library.read_update(id, request.read)?;
    state.store.save(id, reading_state).await?;
    let book = library.apply(id, reading_state)?.clone();

    tracing::info!(
        request_id = %request_id,
        book_id = %id,
        read = request.read,
        "Updated read status"
    );

    Ok(Json(book))
}

/// Rate a book, which also marks it read
pub async fn set_rating(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<u32>,
    Json(request): Json<SetRatingRequest>,
) -> AppResult<Json<Book>> {
    let id = BookId(id);
    let mut library = state.library.write().await;
    let reading_state = library.rating_update(id, request.rating)?;
    state.store.save(id, reading_state).await?;
    let book = library.apply(id, reading_state)?.clone();

    tracing::info!(
        request_id = %request_id,
        book_id = %id,
        rating = request.rating,
        "Rated book"
    );

    Ok(Json(book))
}

/// Forget every read flag and rating
pub async fn clear_reading_data(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<StatusCode> {
    let mut library = state.library.write().await;
    state.store.clear().await?;
    library.clear_reading_data();

    tracing::info!(request_id = %request_id, store = state.store.name(), "Cleared reading data");

    Ok(StatusCode::NO_CONTENT)
}

/// Reading progress summary
pub async fn get_stats(State(state): State<AppState>) -> Json<LibraryStats> {
    let library = state.library.read().await;
    Json(library.stats())
}

/// Recompute "one shelf over" recommendations from the current library.
///
/// Responds 204 when there is nothing to recommend.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Response {
    let library = state.library.read().await;
    let recommender = Recommender::new(library.books());

    let Some(candidates) = recommender.recommend() else {
        tracing::info!(request_id = %request_id, "No recommendations to show");
        return StatusCode::NO_CONTENT.into_response();
    };

    let response = RecommendationsResponse {
        recommendations: candidates
            .iter()
            .map(|c| RecommendationResponse::from_candidate(c, &state.theme_visuals))
            .collect(),
        based_on: recommender
            .highly_rated()
            .iter()
            .map(|b| b.title.clone())
            .collect(),
        generated_at: Utc::now(),
    };

    tracing::info!(
        request_id = %request_id,
        count = response.recommendations.len(),
        top_score = candidates[0].shelf_score,
        "Recommendations computed"
    );

    Json(response).into_response()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::db::MockReadingStore;
    use crate::models::ReadingState;
    use crate::services::Library;

    fn library() -> Library {
        let books = crate::services::catalog::parse_catalog(
            r#"[
                {"id": 1, "title": "Seed", "author": "A", "year": 1950, "themes": ["war", "memory"]},
                {"id": 2, "title": "Candidate", "author": "B", "year": 2020, "themes": ["war"]}
            ]"#,
        )
        .unwrap();
        Library::from_catalog(books, HashMap::new())
    }

    fn state_with(store: MockReadingStore) -> AppState {
        AppState::new(library(), Arc::new(store), ThemeVisuals::default())
    }

    #[tokio::test]
    async fn test_set_rating_saves_new_state() {
        let mut store = MockReadingStore::new();
        store
            .expect_save()
            .withf(|id, state| *id == BookId(1) && *state == ReadingState { read: true, rating: 4 })
            .times(1)
            .returning(|_, _| Ok(()));

        let Json(book) = set_rating(
            State(state_with(store)),
            Extension(RequestId::generate()),
            Path(1),
            Json(SetRatingRequest { rating: 4 }),
        )
        .await
        .unwrap();

        assert_eq!(book.rating, 4);
        assert!(book.read);
    }

    #[tokio::test]
    async fn test_invalid_rating_never_reaches_store() {
        let mut store = MockReadingStore::new();
        store.expect_save().times(0);

        let result = set_rating(
            State(state_with(store)),
            Extension(RequestId::generate()),
            Path(1),
            Json(SetRatingRequest { rating: 0 }),
        )
        .await;

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        let mut store = MockReadingStore::new();
        store
            .expect_save()
            .returning(|_, _| Err(AppError::Internal("store offline".to_string())));
        let state = state_with(store);

        let result = set_read(
            State(state.clone()),
            Extension(RequestId::generate()),
            Path(2),
            Json(SetReadRequest { read: true }),
        )
        .await;
        assert!(matches!(result, Err(AppError::Internal(_))));

        let result = set_rating(
            State(state.clone()),
            Extension(RequestId::generate()),
            Path(1),
            Json(SetRatingRequest { rating: 5 }),
        )
        .await;
        assert!(matches!(result, Err(AppError::Internal(_))));

        let library = state.library.read().await;
        for id in [1, 2] {
            let book = library.get(BookId(id)).unwrap();
            assert_eq!(book.reading_state(), ReadingState::default());
        }
        assert!(Recommender::new(library.books()).recommend().is_none());
    }

    #[tokio::test]
    async fn test_failed_clear_keeps_reading_data() {
        let mut store = MockReadingStore::new();
        store.expect_save().returning(|_, _| Ok(()));
        store
            .expect_clear()
            .returning(|| Err(AppError::Internal("store offline".to_string())));
        let state = state_with(store);

        set_rating(
            State(state.clone()),
            Extension(RequestId::generate()),
            Path(1),
            Json(SetRatingRequest { rating: 4 }),
        )
        .await
        .unwrap();

        let result = clear_reading_data(State(state.clone()), Extension(RequestId::generate())).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(state.library.read().await.get(BookId(1)).unwrap().rating, 4);
    }

    #[tokio::test]
    async fn test_clear_calls_store() {
        let mut store = MockReadingStore::new();
        store.expect_clear().times(1).returning(|| Ok(()));
        store.expect_name().return_const("mock");

        let status = clear_reading_data(State(state_with(store)), Extension(RequestId::generate()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_recommendations_decorate_at_most_four_themes() {
        let books = crate::services::catalog::parse_catalog(
            r#"[
                {"id": 1, "title": "A", "author": "X", "year": 1800, "themes": ["war", "memory"]},
                {"id": 2, "title": "B", "author": "X", "year": 1800, "themes": ["AI", "privacy"]},
                {"id": 3, "title": "C", "author": "X", "year": 1800, "themes": ["survival"]},
                {"id": 4, "title": "D", "author": "X", "year": 2020,
                 "themes": ["war", "memory", "AI", "privacy", "survival"]}
            ]"#,
        )
        .unwrap();
        let mut library = Library::from_catalog(books, HashMap::new());
        for id in 1..=3 {
            library
                .apply(BookId(id), ReadingState { read: true, rating: 5 })
                .unwrap();
        }
        let visuals = ThemeVisuals::default();

        let recommender = Recommender::new(library.books());
        let candidates = recommender.recommend().unwrap();
        assert_eq!(candidates[0].matched_themes.len(), 5);

        let response = RecommendationResponse::from_candidate(&candidates[0], &visuals);
        let names: Vec<&str> = response.matched_themes.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["war", "memory", "AI", "privacy"]);
        assert_eq!(response.matched_themes[2].icon, "🤖");
    }
}
