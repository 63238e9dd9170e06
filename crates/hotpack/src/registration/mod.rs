pub mod chunk_list_provider;
pub mod chunk_update_listener;

use std::future::Future;

use futures::future::try_join_all;
use hotpack_common::{ChunkList, ChunkPath, ModuleId, RuntimeParams, SourceInfo};
use tracing::debug;

use crate::{
  types::module_factory::ModuleFactory, update::dispose_phase::DisposeMode, Runtime,
};

use self::{chunk_list_provider::ChunkListProvider, chunk_update_listener::ChunkUpdateListener};

/// What a chunk hands to the runtime once its code arrived.
pub struct ChunkRegistration {
  pub chunk_path: ChunkPath,
  pub modules: Vec<(ModuleId, ModuleFactory)>,
  /// Present when the chunk carries a runtime that must be started.
  pub params: Option<RuntimeParams>,
}

impl Runtime {
  /// Installs the factories of a chunk and records which modules it contains.
  ///
  /// The bookkeeping happens before this returns. The returned future forwards
  /// the registration to the backend and, for runtime chunks, loads the other
  /// chunks of the runtime and instantiates its runtime modules.
  pub fn register_chunk(
    &self,
    registration: ChunkRegistration,
  ) -> impl Future<Output = anyhow::Result<()>> {
    let ChunkRegistration { chunk_path, modules, params } = registration;
    {
      let mut state = self.state_mut();
      for (module_id, factory) in modules {
        // A factory already installed stays; updates replace factories explicitly.
        state.module_factories.entry(module_id.clone()).or_insert(factory);
        state.chunk_index.add_module_to_chunk(module_id, chunk_path.clone());
      }
    }

    let registered = self.backend().register_chunk(&chunk_path, params.as_ref());
    let runtime = self.clone();
    async move {
      registered.await?;
      if let Some(params) = params {
        runtime.start_chunk_runtime(&chunk_path, &params).await?;
      }
      Ok(())
    }
  }

  async fn start_chunk_runtime(
    &self,
    chunk_path: &ChunkPath,
    params: &RuntimeParams,
  ) -> anyhow::Result<()> {
    let source = SourceInfo::runtime(chunk_path.clone());
    try_join_all(params.other_chunks.iter().map(|chunk_data| self.load_chunk(&source, chunk_data)))
      .await?;

    for module_id in &params.runtime_module_ids {
      self.get_or_instantiate_runtime_module(module_id, chunk_path)?;
    }
    Ok(())
  }

  /// Records a chunk list and subscribes it to updates.
  pub fn register_chunk_list(&self, chunk_list: ChunkList) {
    let mut state = self.state_mut();
    state.update_listeners.push(ChunkUpdateListener::new(chunk_list.path.clone(), self.downgrade()));
    state
      .chunk_index
      .register_chunk_list(&chunk_list.path, chunk_list.chunks.iter().map(|c| c.path().clone()));
    if chunk_list.is_runtime() {
      state.chunk_index.mark_chunk_list_as_runtime(chunk_list.path);
    }
  }

  /// Registers chunk lists pushed before the runtime was live.
  pub fn register_chunk_lists(&self, chunk_lists: impl IntoIterator<Item = ChunkList>) {
    for chunk_list in chunk_lists {
      self.register_chunk_list(chunk_list);
    }
  }

  /// Push-style registration point for chunk lists that show up later.
  pub fn chunk_list_provider(&self) -> ChunkListProvider {
    ChunkListProvider::new(self.downgrade())
  }

  /// One listener per registered chunk list; the host routes server messages to them.
  pub fn update_listeners(&self) -> Vec<ChunkUpdateListener> {
    self.state().update_listeners.clone()
  }

  /// Disposes of a chunk list and the chunks only it referenced.
  pub fn dispose_chunk_list(&self, chunk_list_path: &ChunkPath) -> bool {
    let exclusive_chunks = self.state_mut().chunk_index.remove_chunk_list(chunk_list_path);
    let Some(exclusive_chunks) = exclusive_chunks else {
      return false;
    };
    debug!(chunk_list = %chunk_list_path, chunks = exclusive_chunks.len(), "disposing chunk list");

    for chunk_path in &exclusive_chunks {
      self.dispose_chunk(chunk_path);
    }
    self.state_mut().update_listeners.retain(|listener| listener.chunk_list_path() != chunk_list_path);

    // The chunk list's own chunk must go too, so that it can be loaded again later.
    self.unload_chunk(chunk_list_path);
    true
  }

  /// Disposes of a chunk and the modules no other chunk contains.
  pub fn dispose_chunk(&self, chunk_path: &ChunkPath) -> bool {
    // Chunks without modules (e.g. styles) still need to be unloaded.
    self.unload_chunk(chunk_path);

    let orphaned_modules = self.state_mut().chunk_index.remove_chunk(chunk_path);
    let Some(orphaned_modules) = orphaned_modules else {
      return false;
    };
    for module_id in &orphaned_modules {
      self.dispose_module(module_id, DisposeMode::Clear);
    }
    true
  }
}
