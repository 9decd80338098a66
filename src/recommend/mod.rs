//! Recommendation service over the pretrained embedding model
//!
//! Three read-only operations: popularity counting, item-seeded similarity,
//! and demographic-cohort similarity. All state is immutable after
//! construction, so a single `Recommender` can be shared across request
//! handlers without locking.

pub mod filters;
pub mod scoring;

pub use filters::DemographicFilter;

use crate::catalog::{Book, Catalog, RatingTable, UserTable};
use crate::model::ModelState;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Default result count when a request does not specify one.
pub const DEFAULT_TOP_K: usize = 5;

/// Seed for the popularity fallback sampler. Fixed so the fallback is
/// reproducible, not statistically meaningful.
const FALLBACK_SEED: u64 = 42;

/// Recoverable request validation errors. Surfaced to the caller as a
/// structured payload, never fatal to the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// None of the submitted ISBNs exist in the item index map
    #[error("No valid ISBNs found in database")]
    NoValidItems,

    /// The demographic filters matched no user records
    #[error("No matching users found")]
    NoMatchingUsers,

    /// Matched users exist but none were seen at training time
    #[error("No users found in user ID mapping")]
    NoUsersInMapping,
}

pub type RecommendResult<T> = Result<T, RecommendError>;

/// A recommended book as returned to callers. Field names follow the
/// upstream dataset headers.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BookRecord {
    #[serde(rename = "Book-Title")]
    pub title: String,
    #[serde(rename = "Book-Author")]
    pub author: String,
    #[serde(rename = "Year-Of-Publication")]
    pub year: String,
    #[serde(rename = "Image-URL-M")]
    pub image_url: String,
}

impl From<&Book> for BookRecord {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year.clone(),
            image_url: book.image_url.clone(),
        }
    }
}

/// The recommendation service. Constructed once at startup from loaded
/// state and injected into request handlers; no ambient globals.
#[derive(Debug)]
pub struct Recommender {
    model: ModelState,
    catalog: Catalog,
    users: UserTable,
    ratings: RatingTable,
}

impl Recommender {
    pub fn new(model: ModelState, catalog: Catalog, users: UserTable, ratings: RatingTable) -> Self {
        Self {
            model,
            catalog,
            users,
            ratings,
        }
    }

    pub fn model(&self) -> &ModelState {
        &self.model
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn users(&self) -> &UserTable {
        &self.users
    }

    pub fn ratings(&self) -> &RatingTable {
        &self.ratings
    }

    /// Top-K books by interaction count.
    ///
    /// Ties break by ascending ISBN, so the ranking is stable. If either the
    /// ratings or the catalog table is empty, falls back to a fixed-seed
    /// sample of the catalog. Never fails; may return fewer than `top_k`
    /// records when counted ISBNs are missing from the catalog.
    pub fn recommend_popular(&self, top_k: usize) -> Vec<BookRecord> {
        if self.ratings.is_empty() || self.catalog.is_empty() {
            return self.sample_fallback(top_k);
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for rating in self.ratings.iter() {
            *counts.entry(rating.isbn.as_str()).or_default() += 1;
        }

        let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        ranked
            .iter()
            .take(top_k)
            .filter_map(|(isbn, _)| self.catalog.get(isbn))
            .map(BookRecord::from)
            .collect()
    }

    /// Recommendations for an anonymous user described by a set of
    /// interacted ISBNs.
    ///
    /// ISBNs unknown to the item index map are silently dropped; if none
    /// survive the call fails. The result never contains an input item and
    /// has at most `top_k` entries.
    pub fn recommend_from_items(
        &self,
        isbns: &[String],
        top_k: usize,
    ) -> RecommendResult<Vec<BookRecord>> {
        let rows: Vec<usize> = isbns
            .iter()
            .filter_map(|isbn| self.model.item_node(isbn))
            .collect();
        if rows.is_empty() {
            return Err(RecommendError::NoValidItems);
        }
        debug!(requested = isbns.len(), mapped = rows.len(), "item-seeded query");
        Ok(self.score_and_resolve(&rows, top_k))
    }

    /// Recommendations for the cohort of users matching the demographic
    /// filters.
    ///
    /// Fails if the filters match no users, or if none of the matched users
    /// were seen at training time.
    pub fn recommend_from_users(
        &self,
        filter: &DemographicFilter,
        top_k: usize,
    ) -> RecommendResult<Vec<BookRecord>> {
        let matched: Vec<u32> = self
            .users
            .iter()
            .filter(|u| filter.matches(u))
            .map(|u| u.user_id)
            .collect();
        if matched.is_empty() {
            return Err(RecommendError::NoMatchingUsers);
        }

        let rows: Vec<usize> = matched
            .iter()
            .filter_map(|&user_id| self.model.user_node(user_id))
            .collect();
        if rows.is_empty() {
            return Err(RecommendError::NoUsersInMapping);
        }
        debug!(matched = matched.len(), mapped = rows.len(), "cohort query");
        Ok(self.score_and_resolve(&rows, top_k))
    }

    /// Shared scoring path: average the query rows into a pseudo-user
    /// vector, score every node, over-fetch by the query size, then drop the
    /// query rows themselves.
    ///
    /// The exclusion set holds the queried node indices as-is: item nodes
    /// for item-seeded queries, user nodes for cohort queries. Users and
    /// items share one index space, and user nodes that reach the selection
    /// fall out at the index-to-ISBN step below. The result may therefore be
    /// shorter than `top_k`.
    fn score_and_resolve(&self, query_rows: &[usize], top_k: usize) -> Vec<BookRecord> {
        let table = self.model.embeddings();
        let target = table.mean_of(query_rows);
        let exclude: HashSet<usize> = query_rows.iter().copied().collect();

        let picked = scoring::top_scored(table, &target, top_k + query_rows.len())
            .into_iter()
            .filter(|(idx, _)| !exclude.contains(idx))
            .take(top_k);

        let mut records = Vec::new();
        for (idx, _score) in picked {
            let Some(isbn) = self.model.item_of_node(idx) else {
                continue;
            };
            // Known inconsistency: an ISBN can exist in the model but not in
            // the catalog. Skip silently.
            if let Some(book) = self.catalog.get(isbn) {
                records.push(BookRecord::from(book));
            }
        }
        records
    }

    /// Fixed-seed catalog sample used when popularity counting has no data.
    fn sample_fallback(&self, top_k: usize) -> Vec<BookRecord> {
        if self.catalog.is_empty() {
            return Vec::new();
        }
        let amount = top_k.min(self.catalog.len());
        let mut rng = StdRng::seed_from_u64(FALLBACK_SEED);
        rand::seq::index::sample(&mut rng, self.catalog.len(), amount)
            .iter()
            .filter_map(|i| self.catalog.get_index(i))
            .map(BookRecord::from)
            .collect()
    }
}
