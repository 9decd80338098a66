//! Flat reference datasets: book catalog, user demographics, rating interactions
//!
//! All three tables are loaded once at startup and held read-only for the
//! lifetime of the process. There is no write path.

pub mod loader;

pub use loader::{load_books, load_ratings, load_users, CatalogError, CatalogResult};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single catalog entry, keyed by ISBN.
///
/// Field names follow the upstream dataset headers so CSV rows and JSON
/// responses stay wire-compatible with the original data dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(rename = "Book-Title")]
    pub title: String,
    #[serde(rename = "Book-Author")]
    pub author: String,
    #[serde(rename = "Year-Of-Publication")]
    pub year: String,
    #[serde(rename = "Image-URL-M")]
    pub image_url: String,
}

/// A user demographic record. `age` is frequently missing in the source data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "User-ID")]
    pub user_id: u32,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Age")]
    pub age: Option<f64>,
}

/// One (user, item, rating) interaction triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "User-ID")]
    pub user_id: u32,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(rename = "Book-Rating")]
    pub rating: u8,
}

/// Book catalog keyed by ISBN, preserving file order.
///
/// File order matters for the deterministic popularity fallback: sampling
/// indexes into this map positionally.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: IndexMap<String, Book>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_books(books: impl IntoIterator<Item = Book>) -> Self {
        let books = books.into_iter().map(|b| (b.isbn.clone(), b)).collect();
        Self { books }
    }

    /// Look up a book by ISBN. An ISBN known to the embedding model but
    /// absent here is a tolerated inconsistency, not an error.
    pub fn get(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// Positional access, used by the seeded fallback sampler.
    pub fn get_index(&self, idx: usize) -> Option<&Book> {
        self.books.get_index(idx).map(|(_, b)| b)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }
}

/// All user demographic records, in file order.
#[derive(Debug, Clone, Default)]
pub struct UserTable {
    users: Vec<UserRecord>,
}

impl UserTable {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.iter()
    }
}

/// All rating interactions, in file order.
#[derive(Debug, Clone, Default)]
pub struct RatingTable {
    ratings: Vec<Rating>,
}

impl RatingTable {
    pub fn new(ratings: Vec<Rating>) -> Self {
        Self { ratings }
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rating> {
        self.ratings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(isbn: &str, title: &str) -> Book {
        Book {
            isbn: isbn.to_string(),
            title: title.to_string(),
            author: "Author".to_string(),
            year: "1999".to_string(),
            image_url: String::new(),
        }
    }

    #[test]
    fn test_catalog_lookup_and_order() {
        let catalog = Catalog::from_books(vec![book("B", "second"), book("A", "first")]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("A").unwrap().title, "first");
        assert!(catalog.get("Z").is_none());

        // Positional access reflects insertion order, not key order
        assert_eq!(catalog.get_index(0).unwrap().isbn, "B");
        assert_eq!(catalog.get_index(1).unwrap().isbn, "A");
    }

    #[test]
    fn test_book_wire_field_names() {
        let json = serde_json::to_value(book("0316666343", "The Lovely Bones")).unwrap();
        assert_eq!(json["ISBN"], "0316666343");
        assert_eq!(json["Book-Title"], "The Lovely Bones");
        assert!(json.get("Year-Of-Publication").is_some());
        assert!(json.get("Image-URL-M").is_some());
    }
}
