use hotpack_common::{ChunkPath, ModuleId};
use hotpack_utils::indexmap::FxIndexSet;
use rustc_hash::{FxHashMap, FxHashSet};

/// Which chunks contain which modules, and which chunk lists reference which chunks.
///
/// Membership is tracked in both directions so a module that leaves one chunk
/// but still lives in another is never disposed eagerly.
#[derive(Debug, Default)]
pub struct ChunkMembershipIndex {
  module_chunks: FxHashMap<ModuleId, FxIndexSet<ChunkPath>>,
  chunk_modules: FxHashMap<ChunkPath, FxIndexSet<ModuleId>>,
  /// Chunk lists that contain a runtime. An update they cannot reconcile reloads everything.
  runtime_chunk_lists: FxHashSet<ChunkPath>,
  chunk_list_chunks: FxHashMap<ChunkPath, FxIndexSet<ChunkPath>>,
  chunk_chunk_lists: FxHashMap<ChunkPath, FxIndexSet<ChunkPath>>,
}

impl ChunkMembershipIndex {
  pub fn add_module_to_chunk(&mut self, module_id: ModuleId, chunk_path: ChunkPath) {
    self.module_chunks.entry(module_id.clone()).or_default().insert(chunk_path.clone());
    self.chunk_modules.entry(chunk_path).or_default().insert(module_id);
  }

  /// Returns `true` if no chunk contains the module anymore.
  pub fn remove_module_from_chunk(&mut self, module_id: &ModuleId, chunk_path: &ChunkPath) -> bool {
    if let Some(chunk_modules) = self.chunk_modules.get_mut(chunk_path) {
      chunk_modules.shift_remove(module_id);
      if chunk_modules.is_empty() {
        self.chunk_modules.remove(chunk_path);
      }
    }

    let Some(module_chunks) = self.module_chunks.get_mut(module_id) else {
      return true;
    };
    module_chunks.shift_remove(chunk_path);
    let no_remaining_chunks = module_chunks.is_empty();
    if no_remaining_chunks {
      self.module_chunks.remove(module_id);
    }
    no_remaining_chunks
  }

  pub fn chunk_modules(&self, chunk_path: &ChunkPath) -> Option<&FxIndexSet<ModuleId>> {
    self.chunk_modules.get(chunk_path)
  }

  pub fn module_chunks(&self, module_id: &ModuleId) -> Option<&FxIndexSet<ChunkPath>> {
    self.module_chunks.get(module_id)
  }

  /// The first chunk that included the module.
  pub fn first_module_chunk(&self, module_id: &ModuleId) -> Option<&ChunkPath> {
    self.module_chunks.get(module_id).and_then(|chunks| chunks.first())
  }

  pub fn register_chunk_list(
    &mut self,
    chunk_list_path: &ChunkPath,
    chunks: impl IntoIterator<Item = ChunkPath>,
  ) {
    let chunks = chunks.into_iter().collect::<FxIndexSet<_>>();
    for chunk_path in &chunks {
      self.chunk_chunk_lists.entry(chunk_path.clone()).or_default().insert(chunk_list_path.clone());
    }
    self.chunk_list_chunks.insert(chunk_list_path.clone(), chunks);
  }

  /// There can be more than one runtime chunk list, e.g. several entry points on one page.
  pub fn mark_chunk_list_as_runtime(&mut self, chunk_list_path: ChunkPath) {
    self.runtime_chunk_lists.insert(chunk_list_path);
  }

  pub fn is_runtime_chunk_list(&self, chunk_list_path: &ChunkPath) -> bool {
    self.runtime_chunk_lists.contains(chunk_list_path)
  }

  pub fn chunk_list_chunks(&self, chunk_list_path: &ChunkPath) -> Option<&FxIndexSet<ChunkPath>> {
    self.chunk_list_chunks.get(chunk_list_path)
  }

  /// Forgets a chunk list. Returns the chunks no other chunk list references
  /// anymore, or `None` if the chunk list was unknown.
  pub fn remove_chunk_list(&mut self, chunk_list_path: &ChunkPath) -> Option<Vec<ChunkPath>> {
    let chunk_paths = self.chunk_list_chunks.remove(chunk_list_path)?;

    let mut exclusive_chunks = Vec::new();
    for chunk_path in chunk_paths {
      let Some(chunk_lists) = self.chunk_chunk_lists.get_mut(&chunk_path) else {
        continue;
      };
      chunk_lists.shift_remove(chunk_list_path);
      if chunk_lists.is_empty() {
        self.chunk_chunk_lists.remove(&chunk_path);
        exclusive_chunks.push(chunk_path);
      }
    }
    Some(exclusive_chunks)
  }

  /// Forgets a chunk. Returns the modules that no chunk contains anymore, or
  /// `None` if the chunk had no modules.
  pub fn remove_chunk(&mut self, chunk_path: &ChunkPath) -> Option<Vec<ModuleId>> {
    let chunk_modules = self.chunk_modules.remove(chunk_path)?;

    let mut orphaned_modules = Vec::new();
    for module_id in chunk_modules {
      let Some(module_chunks) = self.module_chunks.get_mut(&module_id) else {
        continue;
      };
      module_chunks.shift_remove(chunk_path);
      if module_chunks.is_empty() {
        self.module_chunks.remove(&module_id);
        orphaned_modules.push(module_id);
      }
    }
    Some(orphaned_modules)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ids(ids: &[&str]) -> Vec<ModuleId> {
    ids.iter().copied().map(ModuleId::from).collect()
  }

  #[test]
  fn module_is_disposable_only_after_last_chunk() {
    let mut index = ChunkMembershipIndex::default();
    index.add_module_to_chunk("m".into(), "a.js".into());
    index.add_module_to_chunk("m".into(), "b.js".into());

    assert!(!index.remove_module_from_chunk(&"m".into(), &"a.js".into()));
    assert_eq!(index.first_module_chunk(&"m".into()), Some(&ChunkPath::from("b.js")));
    assert!(index.chunk_modules(&"a.js".into()).is_none());

    assert!(index.remove_module_from_chunk(&"m".into(), &"b.js".into()));
    assert!(index.module_chunks(&"m".into()).is_none());
  }

  #[test]
  fn remove_chunk_list_reports_exclusive_chunks() {
    let mut index = ChunkMembershipIndex::default();
    index.register_chunk_list(&"entry".into(), ["shared.js".into(), "main.js".into()]);
    index.mark_chunk_list_as_runtime("entry".into());
    index.register_chunk_list(&"lazy".into(), ["shared.js".into(), "lazy.js".into()]);

    assert!(index.is_runtime_chunk_list(&"entry".into()));
    assert!(!index.is_runtime_chunk_list(&"lazy".into()));
    assert_eq!(index.remove_chunk_list(&"lazy".into()), Some(vec![ChunkPath::from("lazy.js")]));
    assert_eq!(index.remove_chunk_list(&"lazy".into()), None);
    assert_eq!(
      index.remove_chunk_list(&"entry".into()),
      Some(vec![ChunkPath::from("shared.js"), ChunkPath::from("main.js")])
    );
  }

  #[test]
  fn remove_chunk_reports_orphaned_modules() {
    let mut index = ChunkMembershipIndex::default();
    index.add_module_to_chunk("a".into(), "lazy.js".into());
    index.add_module_to_chunk("b".into(), "lazy.js".into());
    index.add_module_to_chunk("b".into(), "main.js".into());

    assert_eq!(index.remove_chunk(&"lazy.js".into()), Some(ids(&["a"])));
    assert_eq!(index.remove_chunk(&"lazy.js".into()), None);
    assert_eq!(index.first_module_chunk(&"b".into()), Some(&ChunkPath::from("main.js")));
  }
}
