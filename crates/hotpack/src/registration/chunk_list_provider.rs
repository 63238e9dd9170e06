use hotpack_common::ChunkList;

use crate::runtime::WeakRuntime;

/// Lets generated bootstrap code register chunk lists after the runtime is live.
#[derive(Clone)]
pub struct ChunkListProvider {
  runtime: WeakRuntime,
}

impl ChunkListProvider {
  pub(crate) fn new(runtime: WeakRuntime) -> Self {
    Self { runtime }
  }

  /// Returns `false` if the runtime is gone.
  pub fn push(&self, chunk_list: ChunkList) -> bool {
    let Some(runtime) = self.runtime.upgrade() else {
      return false;
    };
    runtime.register_chunk_list(chunk_list);
    true
  }
}
