use anyhow::Context;
use readnext::catalog::{load_books, load_ratings, load_users};
use readnext::http::{HttpServer, ServerConfig};
use readnext::model::checkpoint::load_model;
use readnext::recommend::Recommender;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("ReadNext recommendation service v{}", readnext::version());

    let config = ServerConfig::from_env();
    let recommender = load_state(&config)?;

    info!(
        books = recommender.catalog().len(),
        users = recommender.users().len(),
        ratings = recommender.ratings().len(),
        nodes = recommender.model().node_count(),
        "startup load complete"
    );

    let server = HttpServer::new(Arc::new(recommender), config);
    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))
}

/// Load every dataset and the model checkpoint. Any failure here aborts
/// startup; the process must not serve partial state.
fn load_state(config: &ServerConfig) -> anyhow::Result<Recommender> {
    let data_dir = Path::new(&config.data_dir);

    let catalog = load_books(&data_dir.join("books.csv")).context("loading book catalog")?;
    let ratings = load_ratings(&data_dir.join("ratings.csv")).context("loading ratings")?;
    let users = load_users(&data_dir.join("users.csv")).context("loading users")?;
    let model =
        load_model(Path::new(&config.checkpoint_path)).context("loading model checkpoint")?;

    Ok(Recommender::new(model, catalog, users, ratings))
}
