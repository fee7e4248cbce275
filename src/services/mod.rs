pub mod catalog;
pub mod library;
pub mod recommender;
pub mod style;
pub mod themes;

pub use catalog::{catalog_source, CatalogSource};
pub use library::{BookQuery, Library, LibraryStats};
pub use recommender::Recommender;
pub use themes::ThemeVisuals;
