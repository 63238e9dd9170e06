use serde::Deserialize;

use crate::{ChunkData, ChunkPath};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkListSource {
  /// Belongs to an entry point. Losing it requires a full restart.
  Entry,
  /// Belongs to a dynamic import boundary and can be torn down on its own.
  Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChunkList {
  pub path: ChunkPath,
  pub chunks: Vec<ChunkData>,
  pub source: ChunkListSource,
}

impl ChunkList {
  pub fn is_runtime(&self) -> bool {
    matches!(self.source, ChunkListSource::Entry)
  }
}
