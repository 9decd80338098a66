use indexmap::IndexMap;
use readnext::catalog::{Book, Catalog, Rating, RatingTable, UserRecord, UserTable};
use readnext::model::{EmbeddingTable, ModelState};
use readnext::recommend::{DemographicFilter, RecommendError, Recommender};

fn book(isbn: &str) -> Book {
    Book {
        isbn: isbn.to_string(),
        title: format!("Title {isbn}"),
        author: format!("Author {isbn}"),
        year: "2002".to_string(),
        image_url: format!("http://img/{isbn}.jpg"),
    }
}

fn user(user_id: u32, location: &str, age: Option<f64>) -> UserRecord {
    UserRecord {
        user_id,
        location: location.to_string(),
        age,
    }
}

fn rating(user_id: u32, isbn: &str) -> Rating {
    Rating {
        user_id,
        isbn: isbn.to_string(),
        rating: 8,
    }
}

/// Item map {"A":0,"B":1,"C":2,"D":3} over fixed 2-d vectors, plus two user
/// nodes (4 and 5) pulling toward opposite ends of the item space.
fn build_recommender() -> Recommender {
    let data = vec![
        1.0, 0.0, // node 0: item A
        0.9, 0.1, // node 1: item B
        0.2, 0.8, // node 2: item C
        0.0, 1.0, // node 3: item D
        0.95, 0.05, // node 4: user 100, reads like A/B
        0.05, 0.95, // node 5: user 200, reads like C/D
    ];
    let table = EmbeddingTable::new(2, data).unwrap();

    let mut items = IndexMap::new();
    for (i, isbn) in ["A", "B", "C", "D"].iter().enumerate() {
        items.insert(isbn.to_string(), i);
    }
    let mut users = IndexMap::new();
    users.insert(100u32, 4usize);
    users.insert(200u32, 5usize);
    let model = ModelState::new(table, users, items).unwrap();

    let catalog = Catalog::from_books(["A", "B", "C", "D"].map(book));
    let user_table = UserTable::new(vec![
        user(100, "seattle, washington, usa", Some(22.0)),
        user(200, "lyon, france", Some(60.0)),
        user(300, "nowhere, usa", None), // dropped: no age
    ]);
    let ratings = RatingTable::new(vec![
        rating(100, "A"),
        rating(100, "B"),
        rating(200, "B"),
        rating(200, "C"),
        rating(100, "B"),
    ]);

    Recommender::new(model, catalog, user_table, ratings)
}

#[test]
fn items_result_is_disjoint_from_input_and_bounded() {
    let rec = build_recommender();

    let out = rec.recommend_from_items(&["A".to_string()], 2).unwrap();
    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|r| r.title != "Title A"));

    let seeds = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    let out = rec.recommend_from_items(&seeds, 3).unwrap();
    assert!(out.len() <= 3);
    for seed in &seeds {
        assert!(out.iter().all(|r| r.title != format!("Title {seed}")));
    }
}

#[test]
fn empty_item_list_is_a_validation_error() {
    let rec = build_recommender();
    assert_eq!(
        rec.recommend_from_items(&[], 5).unwrap_err(),
        RecommendError::NoValidItems
    );
}

#[test]
fn popularity_ranks_by_count_with_isbn_tie_break() {
    let rec = build_recommender();
    // Counts: B=3, A=1, C=1. A/C tie breaks lexicographically.
    let out = rec.recommend_popular(3);
    let titles: Vec<&str> = out.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Title B", "Title A", "Title C"]);
}

#[test]
fn popularity_fallback_samples_deterministically() {
    let catalog = Catalog::from_books(["A", "B", "C", "D", "E", "F"].map(book));
    let table = EmbeddingTable::new(2, vec![0.0; 2]).unwrap();
    let model = ModelState::new(table, IndexMap::new(), IndexMap::new()).unwrap();
    let rec = Recommender::new(
        model,
        catalog,
        UserTable::default(),
        RatingTable::default(),
    );

    let first = rec.recommend_popular(5);
    let second = rec.recommend_popular(5);
    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
}

#[test]
fn cohort_recommendations_follow_the_filtered_users() {
    let rec = build_recommender();

    // Only user 100 (usa, age 22) matches: the pseudo-user vector points at
    // the A/B end of the space, so A and B lead the ranking.
    let filter = DemographicFilter {
        country: Some("USA".to_string()),
        age_range: Some((18.0, 30.0)),
    };
    let out = rec.recommend_from_users(&filter, 2).unwrap();
    let titles: Vec<&str> = out.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Title A", "Title B"]);

    // Only user 200 (france, age 60) matches: ranking flips to D/C.
    let filter = DemographicFilter {
        country: Some("france".to_string()),
        age_range: None,
    };
    let out = rec.recommend_from_users(&filter, 2).unwrap();
    let titles: Vec<&str> = out.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Title D", "Title C"]);
}

#[test]
fn cohort_with_no_matching_users_is_a_validation_error() {
    let rec = build_recommender();
    let filter = DemographicFilter {
        country: Some("iceland".to_string()),
        age_range: None,
    };
    assert_eq!(
        rec.recommend_from_users(&filter, 5).unwrap_err(),
        RecommendError::NoMatchingUsers
    );
}

#[test]
fn age_range_outside_plausible_band_matches_nobody() {
    let rec = build_recommender();
    // User 300 has no age and is discarded before any range check, so a
    // range that could only match them yields no cohort at all.
    let filter = DemographicFilter {
        country: None,
        age_range: Some((101.0, 120.0)),
    };
    assert_eq!(
        rec.recommend_from_users(&filter, 5).unwrap_err(),
        RecommendError::NoMatchingUsers
    );
}

#[test]
fn all_operations_are_idempotent() {
    let rec = build_recommender();
    let seeds = vec!["B".to_string(), "C".to_string()];
    let filter = DemographicFilter::default();

    assert_eq!(rec.recommend_popular(4), rec.recommend_popular(4));
    assert_eq!(
        rec.recommend_from_items(&seeds, 3).unwrap(),
        rec.recommend_from_items(&seeds, 3).unwrap()
    );
    assert_eq!(
        rec.recommend_from_users(&filter, 3).unwrap(),
        rec.recommend_from_users(&filter, 3).unwrap()
    );
}
