//! Pretrained embedding model state
//!
//! Holds the node embedding table produced by offline LightGCN training plus
//! the bidirectional identifier maps that tie external user IDs and ISBNs to
//! node indices. Users and items share a single node index space. Everything
//! here is immutable after load.

pub mod checkpoint;

pub use checkpoint::Checkpoint;

use indexmap::IndexMap;
use std::collections::HashMap;
use thiserror::Error;

/// Embedding dimension the training pipeline produces.
pub const EMBEDDING_DIM: usize = 64;

/// Model loading errors
#[derive(Error, Debug)]
pub enum ModelError {
    /// IO error
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Corrupt or truncated checkpoint
    #[error("Checkpoint decode error: {0}")]
    Decode(#[from] bincode::Error),

    /// Embedding buffer length is not a multiple of the dimension
    #[error("Embedding table length {len} is not a multiple of dimension {dim}")]
    MalformedTable { len: usize, dim: usize },

    /// An identifier map entry points past the end of the table
    #[error("Node index {index} out of range for {nodes} nodes")]
    IndexOutOfRange { index: usize, nodes: usize },
}

pub type ModelResult<T> = Result<T, ModelError>;

/// Row-major N x D table of node embeddings.
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    dim: usize,
    data: Vec<f32>,
}

impl EmbeddingTable {
    pub fn new(dim: usize, data: Vec<f32>) -> ModelResult<Self> {
        if dim == 0 || data.len() % dim != 0 {
            return Err(ModelError::MalformedTable {
                len: data.len(),
                dim,
            });
        }
        Ok(Self { dim, data })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of node rows.
    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, idx: usize) -> &[f32] {
        let start = idx * self.dim;
        &self.data[start..start + self.dim]
    }

    /// Arithmetic mean of the given rows: the pseudo-user vector.
    ///
    /// Callers guarantee `rows` is non-empty and in range.
    pub fn mean_of(&self, rows: &[usize]) -> Vec<f32> {
        let mut mean = vec![0.0f32; self.dim];
        for &r in rows {
            for (m, v) in mean.iter_mut().zip(self.row(r)) {
                *m += v;
            }
        }
        let n = rows.len() as f32;
        for m in mean.iter_mut() {
            *m /= n;
        }
        mean
    }
}

/// Immutable model state: the embedding table plus identifier maps.
#[derive(Debug, Clone)]
pub struct ModelState {
    embeddings: EmbeddingTable,
    user_to_node: IndexMap<u32, usize>,
    item_to_node: IndexMap<String, usize>,
    // Derived inverse of item_to_node. A node index absent here is a user node.
    node_to_item: HashMap<usize, String>,
}

impl ModelState {
    pub fn new(
        embeddings: EmbeddingTable,
        user_to_node: IndexMap<u32, usize>,
        item_to_node: IndexMap<String, usize>,
    ) -> ModelResult<Self> {
        let nodes = embeddings.len();
        for &index in user_to_node.values().chain(item_to_node.values()) {
            if index >= nodes {
                return Err(ModelError::IndexOutOfRange { index, nodes });
            }
        }
        let node_to_item = item_to_node
            .iter()
            .map(|(isbn, &idx)| (idx, isbn.clone()))
            .collect();
        Ok(Self {
            embeddings,
            user_to_node,
            item_to_node,
            node_to_item,
        })
    }

    pub fn embeddings(&self) -> &EmbeddingTable {
        &self.embeddings
    }

    /// Node index for an ISBN, if the item was seen at training time.
    pub fn item_node(&self, isbn: &str) -> Option<usize> {
        self.item_to_node.get(isbn).copied()
    }

    /// Node index for an external user ID, if the user was seen at training time.
    pub fn user_node(&self, user_id: u32) -> Option<usize> {
        self.user_to_node.get(&user_id).copied()
    }

    /// ISBN for a node index. `None` means the node is a user, not an item.
    pub fn item_of_node(&self, idx: usize) -> Option<&str> {
        self.node_to_item.get(&idx).map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.embeddings.len()
    }

    pub fn user_count(&self) -> usize {
        self.user_to_node.len()
    }

    pub fn item_count(&self) -> usize {
        self.item_to_node.len()
    }
}
