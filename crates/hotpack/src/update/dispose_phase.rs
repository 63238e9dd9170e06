use hotpack_common::{ChunkPath, ModuleId};
use hotpack_utils::indexmap::{FxIndexMap, FxIndexSet};

use crate::{hot::HotData, Runtime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisposeMode {
  /// A new instance follows. The instance stays cached until the whole phase
  /// ran and its `HotData` is kept for the next one.
  Replace,
  /// No chunk contains the module anymore. Everything about it is forgotten.
  Clear,
}

impl Runtime {
  /// Moves modules between chunks. Runs before disposal since only then is it
  /// known which modules left their last chunk.
  pub(crate) fn update_chunks_phase(
    &self,
    chunks_added: &FxIndexMap<ChunkPath, FxIndexSet<ModuleId>>,
    chunks_deleted: &FxIndexMap<ChunkPath, FxIndexSet<ModuleId>>,
  ) -> Vec<ModuleId> {
    let mut state = self.state_mut();
    for (chunk_path, module_ids) in chunks_added {
      for module_id in module_ids {
        state.chunk_index.add_module_to_chunk(module_id.clone(), chunk_path.clone());
      }
    }

    let mut disposed_modules = FxIndexSet::default();
    for (chunk_path, module_ids) in chunks_deleted {
      for module_id in module_ids {
        if state.chunk_index.remove_module_from_chunk(module_id, chunk_path) {
          disposed_modules.insert(module_id.clone());
        }
      }
      // An emptied chunk has to be fetched again once it comes back.
      if state.chunk_index.chunk_modules(chunk_path).is_none() {
        state.chunk_loads.remove(chunk_path);
        state.available_module_chunks.remove(chunk_path);
      }
    }
    disposed_modules.into_iter().collect()
  }

  /// Disposes of outdated and removed modules. Returns the parents each
  /// outdated module had, for its next instance.
  pub(crate) fn dispose_phase(
    &self,
    outdated_modules: &FxIndexSet<ModuleId>,
    disposed_modules: &[ModuleId],
  ) -> FxIndexMap<ModuleId, Vec<ModuleId>> {
    for module_id in outdated_modules {
      self.dispose_module(module_id, DisposeMode::Replace);
    }
    for module_id in disposed_modules {
      self.dispose_module(module_id, DisposeMode::Clear);
    }

    let mut state = self.state_mut();
    outdated_modules
      .iter()
      .map(|module_id| {
        let parents = state
          .module_cache
          .remove(module_id)
          .map(|module| module.parents())
          .unwrap_or_default();
        (module_id.clone(), parents)
      })
      .collect()
  }

  /// Runs the dispose handlers of the cached instance of `module_id` and
  /// detaches it from its children. Their edges come back once the next
  /// instance imports them again.
  pub(crate) fn dispose_module(&self, module_id: &ModuleId, mode: DisposeMode) {
    let Some(module) = self.module(module_id) else {
      return;
    };

    let mut data = HotData::default();
    for handler in module.hot().dispose_handlers() {
      handler(&mut data);
    }
    module.hot().deactivate();

    for child_id in module.children() {
      if let Some(child) = self.module(&child_id) {
        child.remove_parent(module_id);
      }
    }

    let mut state = self.state_mut();
    match mode {
      DisposeMode::Replace => {
        state.module_hot_data.insert(module_id.clone(), data);
      }
      DisposeMode::Clear => {
        state.module_cache.remove(module_id);
        state.module_hot_data.remove(module_id);
        state.available_modules.remove(module_id);
      }
    }
  }
}
