//! Bincode checkpoint format for the trained model
//!
//! The training pipeline exports one self-contained file holding the
//! embedding table and both identifier maps. The serving side treats it as
//! opaque binary state and only reconstructs the in-memory structures.

use crate::model::{EmbeddingTable, ModelError, ModelResult, ModelState, EMBEDDING_DIM};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// On-disk checkpoint layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Embedding dimension (64 for the shipped model)
    pub dim: usize,
    /// Row-major embedding buffer, `dim * node_count` floats
    pub embeddings: Vec<f32>,
    /// External user ID -> node index, in training order
    pub user_ids: Vec<(u32, usize)>,
    /// ISBN -> node index, in training order
    pub item_ids: Vec<(String, usize)>,
}

impl Checkpoint {
    /// Read and decode a checkpoint file.
    pub fn load(path: &Path) -> ModelResult<Self> {
        let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let checkpoint: Checkpoint = bincode::deserialize(&bytes)?;
        info!(
            path = %path.display(),
            dim = checkpoint.dim,
            users = checkpoint.user_ids.len(),
            items = checkpoint.item_ids.len(),
            "loaded model checkpoint"
        );
        if checkpoint.dim != EMBEDDING_DIM {
            warn!(
                dim = checkpoint.dim,
                expected = EMBEDDING_DIM,
                "checkpoint dimension differs from the trained default"
            );
        }
        Ok(checkpoint)
    }

    /// Encode and write a checkpoint file. Used by the export tooling and tests.
    pub fn save(&self, path: &Path) -> ModelResult<()> {
        let bytes = bincode::serialize(self)?;
        std::fs::write(path, bytes).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Validate and reconstruct the immutable model state.
    pub fn into_state(self) -> ModelResult<ModelState> {
        let table = EmbeddingTable::new(self.dim, self.embeddings)?;
        let user_to_node: IndexMap<u32, usize> = self.user_ids.into_iter().collect();
        let item_to_node: IndexMap<String, usize> = self.item_ids.into_iter().collect();
        ModelState::new(table, user_to_node, item_to_node)
    }
}

/// Load a checkpoint file straight into model state.
pub fn load_model(path: &Path) -> ModelResult<ModelState> {
    Checkpoint::load(path)?.into_state()
}
