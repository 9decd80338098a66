//! ReadNext Book Recommendation Service
//!
//! Serves book recommendations from a pretrained LightGCN-style graph
//! embedding model over three flat datasets (books, ratings, users). Users
//! and items live in one shared 64-dimensional node embedding space; a query
//! averages the embeddings of its seed nodes into a pseudo-user vector and
//! ranks every item by dot-product similarity.
//!
//! All state is loaded once at startup and held immutable for the lifetime
//! of the process. Request handling is pure read-only computation, so the
//! service shares one [`recommend::Recommender`] across handlers without
//! locking.
//!
//! # Example
//!
//! ```rust
//! use readnext::catalog::{Book, Catalog, RatingTable, UserTable};
//! use readnext::model::{EmbeddingTable, ModelState};
//! use readnext::recommend::Recommender;
//! use indexmap::IndexMap;
//!
//! let table = EmbeddingTable::new(2, vec![1.0, 0.0, 0.9, 0.1]).unwrap();
//! let mut items = IndexMap::new();
//! items.insert("A".to_string(), 0);
//! items.insert("B".to_string(), 1);
//! let model = ModelState::new(table, IndexMap::new(), items).unwrap();
//!
//! let catalog = Catalog::from_books(vec![
//!     Book {
//!         isbn: "B".to_string(),
//!         title: "Second".to_string(),
//!         author: "Someone".to_string(),
//!         year: "2001".to_string(),
//!         image_url: String::new(),
//!     },
//! ]);
//!
//! let rec = Recommender::new(model, catalog, UserTable::default(), RatingTable::default());
//! let out = rec.recommend_from_items(&["A".to_string()], 1).unwrap();
//! assert_eq!(out[0].title, "Second");
//! ```

#![warn(clippy::all)]

pub mod catalog;
pub mod http;
pub mod model;
pub mod recommend;

// Re-export main types for convenience
pub use catalog::{
    Book, Catalog, CatalogError, CatalogResult, Rating, RatingTable, UserRecord, UserTable,
};
pub use http::{HttpServer, ServerConfig};
pub use model::{Checkpoint, EmbeddingTable, ModelError, ModelResult, ModelState};
pub use recommend::{
    BookRecord, DemographicFilter, RecommendError, RecommendResult, Recommender, DEFAULT_TOP_K,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
