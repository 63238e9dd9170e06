use anyhow::Context;
use hotpack_common::{ChunkPath, ServerMessage};

use crate::{runtime::WeakRuntime, update::UpdateOutcome};

/// Applies the server messages of one chunk list subscription.
#[derive(Clone)]
pub struct ChunkUpdateListener {
  chunk_list_path: ChunkPath,
  runtime: WeakRuntime,
}

impl ChunkUpdateListener {
  pub(crate) fn new(chunk_list_path: ChunkPath, runtime: WeakRuntime) -> Self {
    Self { chunk_list_path, runtime }
  }

  pub fn chunk_list_path(&self) -> &ChunkPath {
    &self.chunk_list_path
  }

  pub fn handle(&self, message: ServerMessage) -> anyhow::Result<UpdateOutcome> {
    let runtime = self
      .runtime
      .upgrade()
      .with_context(|| format!("runtime of chunk list {} was dropped", self.chunk_list_path))?;
    runtime.handle_update(&self.chunk_list_path, message)
  }
}
