use crate::models::{Book, ScoredCandidate, ShelfLocation};
use crate::services::style::style_similarity;

/// Maximum number of recommendations returned by a pass
pub const MAX_RECOMMENDATIONS: usize = 12;

const SWEET_SPOT: std::ops::RangeInclusive<usize> = 1..=3;
const THEME_BASE: f64 = 30.0;
const THEME_PER_SHARED: f64 = 10.0;
const STYLE_WEIGHT: f64 = 15.0;
const ERA_WINDOW_YEARS: i32 = 20;
const ERA_WEIGHT: f64 = 8.0;
const DIVERSITY_BONUS: f64 = 20.0;
const FALLBACK_REASON: &str = "Recommended based on your tastes";

/// "One shelf over" recommendation engine
///
/// Scores every unread book against every highly rated book and favours books that share
/// some, but not most, of their themes. Holds no state between passes; build one per call
/// from the current collection.
pub struct Recommender<'a> {
    books: &'a [Book],
}

/// Running totals for a single candidate
#[derive(Default)]
struct Accumulator {
    score: f64,
    style: f64,
    matched_themes: Vec<String>,
    reasons: Vec<String>,
}

impl<'a> Recommender<'a> {
    /// Creates a recommender over the full collection, reading state included
    pub fn new(books: &'a [Book]) -> Self {
        Self { books }
    }

    /// Books the recommendations are seeded from
    pub fn highly_rated(&self) -> Vec<&'a Book> {
        self.books
            .iter()
            .filter(|b| b.is_highly_rated())
            .collect()
    }

    /// Ranks unread books, best first.
    ///
    /// Returns `None` when there is nothing to show: either no book is highly rated or no
    /// candidate scored above zero. A returned list is never empty and never longer than
    /// [`MAX_RECOMMENDATIONS`].
    pub fn recommend(&self) -> Option<Vec<ScoredCandidate<'a>>> {
        let highly_rated = self.highly_rated();
        if highly_rated.is_empty() {
            tracing::debug!("No highly rated books, skipping recommendations");
            return None;
        }

        let mut scored: Vec<ScoredCandidate<'a>> = self
            .books
            .iter()
            .filter(|b| !b.read)
            .map(|candidate| Self::score(candidate, &highly_rated))
            .filter(|c| c.shelf_score > 0.0)
            .collect();

        // sort_by is stable, equal scores keep catalog order
        scored.sort_by(|a, b| {
            b.shelf_score
                .partial_cmp(&a.shelf_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(MAX_RECOMMENDATIONS);

        tracing::debug!(
            highly_rated = highly_rated.len(),
            recommended = scored.len(),
            "Recommendation pass complete"
        );

        if scored.is_empty() {
            None
        } else {
            Some(scored)
        }
    }

    /// Scores one candidate against every highly rated book
    fn score(candidate: &'a Book, highly_rated: &[&'a Book]) -> ScoredCandidate<'a> {
        let mut acc = Accumulator::default();

        for rated in highly_rated {
            let weight = f64::from(rated.rating) / 5.0;

            let shared: Vec<&String> = candidate
                .themes
                .iter()
                .filter(|t| rated.themes.contains(t))
                .collect();

            if SWEET_SPOT.contains(&shared.len()) {
                acc.score += weight * (THEME_BASE + shared.len() as f64 * THEME_PER_SHARED);
                for theme in &shared {
                    if !acc.matched_themes.contains(theme) {
                        acc.matched_themes.push((*theme).clone());
                    }
                }
                acc.reasons.push(theme_reason(&shared, &rated.title));
            }

            let similarity = style_similarity(&candidate.writing_style, &rated.writing_style);
            if similarity > 0 {
                acc.style += similarity as f64 * weight * STYLE_WEIGHT;
                acc.reasons
                    .push(format!("Writing style resonates with \"{}\"", rated.title));
            }

            if (candidate.year - rated.year).abs() <= ERA_WINDOW_YEARS {
                acc.score += weight * ERA_WEIGHT;
            }
        }

        let theme_count = acc.matched_themes.len();
        let diversity_bonus = if SWEET_SPOT.contains(&theme_count) {
            DIVERSITY_BONUS
        } else {
            0.0
        };

        ScoredCandidate {
            book: candidate,
            shelf_score: acc.score + acc.style + diversity_bonus,
            style_score: acc.style,
            shelf_location: ShelfLocation::from_match(theme_count, acc.style),
            recommendation_reason: acc
                .reasons
                .into_iter()
                .next()
                .unwrap_or_else(|| FALLBACK_REASON.to_string()),
            matched_themes: acc.matched_themes,
        }
    }
}

/// Explanation for a pair sharing one to three themes
fn theme_reason(shared: &[&String], rated_title: &str) -> String {
    match shared {
        [only] => format!("Adjacent shelf: shares \"{}\" with \"{}\"", only, rated_title),
        [_, _] => format!("Nearby: echoes themes from \"{}\"", rated_title),
        _ => format!("Similar territory to \"{}\"", rated_title),
    }
}
