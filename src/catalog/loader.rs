//! CSV loading for the three flat datasets
//!
//! Load failures here are fatal: the process must not begin serving with a
//! missing or unreadable dataset.

use crate::catalog::{Book, Catalog, Rating, RatingTable, UserRecord, UserTable};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Dataset loading errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// IO error
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV row
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

fn reader(path: &Path) -> CatalogResult<csv::Reader<std::fs::File>> {
    let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(csv::ReaderBuilder::new().has_headers(true).from_reader(file))
}

fn csv_err(path: &Path, source: csv::Error) -> CatalogError {
    CatalogError::Csv {
        path: path.display().to_string(),
        source,
    }
}

/// Load the book catalog from `books.csv`.
pub fn load_books(path: &Path) -> CatalogResult<Catalog> {
    let mut rdr = reader(path)?;
    let mut books = Vec::new();
    for record in rdr.deserialize::<Book>() {
        books.push(record.map_err(|e| csv_err(path, e))?);
    }
    info!(count = books.len(), "loaded book catalog");
    Ok(Catalog::from_books(books))
}

/// Load user demographics from `users.csv`.
pub fn load_users(path: &Path) -> CatalogResult<UserTable> {
    let mut rdr = reader(path)?;
    let mut users = Vec::new();
    for record in rdr.deserialize::<UserRecord>() {
        users.push(record.map_err(|e| csv_err(path, e))?);
    }
    info!(count = users.len(), "loaded user records");
    Ok(UserTable::new(users))
}

/// Load rating interactions from `ratings.csv`.
pub fn load_ratings(path: &Path) -> CatalogResult<RatingTable> {
    let mut rdr = reader(path)?;
    let mut ratings = Vec::new();
    for record in rdr.deserialize::<Rating>() {
        ratings.push(record.map_err(|e| csv_err(path, e))?);
    }
    info!(count = ratings.len(), "loaded rating interactions");
    Ok(RatingTable::new(ratings))
}
