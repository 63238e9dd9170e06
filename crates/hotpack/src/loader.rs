use futures::{
  future::{self, try_join_all},
  FutureExt, TryFutureExt,
};
use hotpack_common::{ChunkData, ChunkDescriptor, ChunkPath, SourceInfo};
use hotpack_error::ChunkLoadError;
use hotpack_utils::indexmap::FxIndexSet;
use tracing::trace;

use crate::{types::ChunkLoad, Runtime};

fn ready_load() -> ChunkLoad {
  future::ready(Ok::<(), ChunkLoadError>(())).boxed_local().shared()
}

fn join_loads(loads: Vec<ChunkLoad>) -> ChunkLoad {
  try_join_all(loads).map_ok(|_| ()).boxed_local().shared()
}

impl Runtime {
  /// Makes the modules of `chunk_data` available, reusing any fetch already in
  /// flight for the same chunk, module or module chunk.
  pub fn load_chunk(&self, source: &SourceInfo, chunk_data: &ChunkData) -> ChunkLoad {
    match chunk_data {
      ChunkData::Path(chunk_path) => self.load_chunk_path(source, chunk_path),
      ChunkData::Descriptor(descriptor) => self.load_chunk_descriptor(source, descriptor),
    }
  }

  fn load_chunk_descriptor(&self, source: &SourceInfo, descriptor: &ChunkDescriptor) -> ChunkLoad {
    let included_loads = {
      let state = self.state();
      descriptor
        .included
        .iter()
        .map(|included| {
          if state.module_factories.contains_key(included) {
            Some(ready_load())
          } else {
            state.available_modules.get(included).cloned()
          }
        })
        .collect::<Vec<_>>()
    };
    if !included_loads.is_empty() && included_loads.iter().all(Option::is_some) {
      // Every included module is already loaded or loading.
      trace!(chunk = %descriptor.path, "skipping fetch, all included modules are available");
      return join_loads(included_loads.into_iter().flatten().collect());
    }

    let mut module_chunk_loads = {
      let state = self.state();
      descriptor
        .module_chunks
        .iter()
        .filter_map(|module_chunk| state.available_module_chunks.get(module_chunk).cloned())
        .collect::<Vec<_>>()
    };

    let load = if module_chunk_loads.is_empty() {
      let load = self.load_chunk_path(source, &descriptor.path);
      let mut state = self.state_mut();
      for module_chunk in &descriptor.module_chunks {
        state.available_module_chunks.entry(module_chunk.clone()).or_insert_with(|| load.clone());
      }
      load
    } else {
      if module_chunk_loads.len() == descriptor.module_chunks.len() {
        trace!(chunk = %descriptor.path, "skipping fetch, all module chunks are available");
        return join_loads(module_chunk_loads);
      }

      let module_chunks_to_load = {
        let state = self.state();
        descriptor
          .module_chunks
          .iter()
          .filter(|module_chunk| !state.available_module_chunks.contains_key(*module_chunk))
          .cloned()
          .collect::<FxIndexSet<_>>()
      };
      for module_chunk in module_chunks_to_load {
        let load = self.load_chunk_path(source, &module_chunk);
        self.state_mut().available_module_chunks.insert(module_chunk, load.clone());
        module_chunk_loads.push(load);
      }
      join_loads(module_chunk_loads)
    };

    // Racing an older fetch against this one rarely pays off, the first one wins.
    let mut state = self.state_mut();
    for included in &descriptor.included {
      state.available_modules.entry(included.clone()).or_insert_with(|| load.clone());
    }

    load
  }

  /// Issues at most one backend fetch per chunk path. A failed fetch is
  /// forgotten so that a later call can try again.
  pub(crate) fn load_chunk_path(&self, source: &SourceInfo, chunk_path: &ChunkPath) -> ChunkLoad {
    if let Some(load) = self.state().chunk_loads.get(chunk_path) {
      trace!(chunk = %chunk_path, "joining pending fetch");
      return load.clone();
    }

    trace!(chunk = %chunk_path, source = %source.source_type(), "fetching chunk");
    let fetch = self.backend().load_chunk(chunk_path, source);
    let runtime = self.downgrade();
    let source = source.clone();
    let chunk_path_for_load = chunk_path.clone();
    let load = async move {
      fetch.await.map_err(|cause| {
        if let Some(runtime) = runtime.upgrade() {
          runtime.state_mut().chunk_loads.remove(&chunk_path_for_load);
        }
        ChunkLoadError::new(chunk_path_for_load, source, cause)
      })
    }
    .boxed_local()
    .shared();

    self.state_mut().chunk_loads.insert(chunk_path.clone(), load.clone());
    load
  }

  /// Unloads a chunk and drops its dedup entries, so that the next load
  /// fetches it again.
  pub(crate) fn unload_chunk(&self, chunk_path: &ChunkPath) {
    self.backend().unload_chunk(chunk_path);
    let mut state = self.state_mut();
    state.chunk_loads.remove(chunk_path);
    state.available_module_chunks.remove(chunk_path);
  }
}
