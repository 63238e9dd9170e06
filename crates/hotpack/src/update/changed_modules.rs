use hotpack_common::{ChunkPath, EcmascriptMergedChunkUpdate, EcmascriptModuleEntry, ModuleId};
use hotpack_utils::indexmap::{FxIndexMap, FxIndexSet};

use crate::chunk_index::ChunkMembershipIndex;

/// A merged update reconciled into per-module and per-chunk sets.
#[derive(Debug, Default, PartialEq)]
pub struct ChangedModules {
  /// Modules newly added to some chunk, with their code if the update carried any.
  pub added: FxIndexMap<ModuleId, Option<EcmascriptModuleEntry>>,
  /// Modules with new code that were not added to any chunk.
  pub modified: FxIndexMap<ModuleId, EcmascriptModuleEntry>,
  pub deleted: FxIndexSet<ModuleId>,
  pub chunks_added: FxIndexMap<ChunkPath, FxIndexSet<ModuleId>>,
  pub chunks_deleted: FxIndexMap<ChunkPath, FxIndexSet<ModuleId>>,
}

impl ChangedModules {
  pub fn compute(
    entries: &FxIndexMap<ModuleId, EcmascriptModuleEntry>,
    chunks: &FxIndexMap<ChunkPath, EcmascriptMergedChunkUpdate>,
    index: &ChunkMembershipIndex,
  ) -> Self {
    let mut changed = Self::default();

    for (chunk_path, chunk_update) in chunks {
      match chunk_update {
        EcmascriptMergedChunkUpdate::Added { modules } => {
          let chunk_added = modules.iter().cloned().collect::<FxIndexSet<_>>();
          for module_id in &chunk_added {
            changed.added.insert(module_id.clone(), entries.get(module_id).cloned());
          }
          changed.chunks_added.insert(chunk_path.clone(), chunk_added);
        }
        EcmascriptMergedChunkUpdate::Deleted { .. } => {
          // What the runtime knows about the chunk is authoritative, not the listed modules.
          let chunk_deleted = index.chunk_modules(chunk_path).cloned().unwrap_or_default();
          changed.deleted.extend(chunk_deleted.iter().cloned());
          changed.chunks_deleted.insert(chunk_path.clone(), chunk_deleted);
        }
        EcmascriptMergedChunkUpdate::Partial { added, deleted } => {
          let chunk_added = added.iter().cloned().collect::<FxIndexSet<_>>();
          let chunk_deleted = deleted.iter().cloned().collect::<FxIndexSet<_>>();
          for module_id in &chunk_added {
            changed.added.insert(module_id.clone(), entries.get(module_id).cloned());
          }
          changed.deleted.extend(chunk_deleted.iter().cloned());
          changed.chunks_added.insert(chunk_path.clone(), chunk_added);
          changed.chunks_deleted.insert(chunk_path.clone(), chunk_deleted);
        }
      }
    }

    // Added to one chunk and deleted from another: the module moved. If it also
    // carries code it is picked up as modified below.
    let moved = changed
      .added
      .keys()
      .filter(|module_id| changed.deleted.contains(*module_id))
      .cloned()
      .collect::<Vec<_>>();
    for module_id in &moved {
      changed.added.shift_remove(module_id);
      changed.deleted.shift_remove(module_id);
    }

    for (module_id, entry) in entries {
      if !changed.added.contains_key(module_id) {
        changed.modified.insert(module_id.clone(), entry.clone());
      }
    }

    changed
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  fn entry(code: &str) -> EcmascriptModuleEntry {
    EcmascriptModuleEntry { code: code.to_string(), url: format!("{code}.js"), map: None }
  }

  fn set(ids: &[&str]) -> FxIndexSet<ModuleId> {
    ids.iter().copied().map(ModuleId::from).collect()
  }

  #[test]
  fn code_without_chunk_change_is_modified() {
    let entries = FxIndexMap::from_iter([(ModuleId::from("2"), entry("two"))]);
    let changed = ChangedModules::compute(&entries, &FxIndexMap::default(), &Default::default());

    assert!(changed.added.is_empty());
    assert_eq!(changed.modified.keys().cloned().collect::<FxIndexSet<_>>(), set(&["2"]));
  }

  #[test]
  fn moved_and_recompiled_module_is_modified() {
    let entries = FxIndexMap::from_iter([(ModuleId::from("m"), entry("m"))]);
    let chunks = FxIndexMap::from_iter([
      (ChunkPath::from("a.js"), EcmascriptMergedChunkUpdate::Partial {
        added: vec![],
        deleted: vec!["m".into()],
      }),
      (ChunkPath::from("b.js"), EcmascriptMergedChunkUpdate::Partial {
        added: vec!["m".into(), "n".into()],
        deleted: vec![],
      }),
    ]);
    let changed = ChangedModules::compute(&entries, &chunks, &Default::default());

    assert_eq!(changed.added.keys().cloned().collect::<FxIndexSet<_>>(), set(&["n"]));
    assert_eq!(changed.added.get(&ModuleId::from("n")), Some(&None));
    assert!(changed.deleted.is_empty());
    assert_eq!(changed.modified.keys().cloned().collect::<FxIndexSet<_>>(), set(&["m"]));
    // Membership still moves.
    assert_eq!(changed.chunks_added[&ChunkPath::from("b.js")], set(&["m", "n"]));
    assert_eq!(changed.chunks_deleted[&ChunkPath::from("a.js")], set(&["m"]));
  }

  #[test]
  fn deleted_chunk_uses_known_membership() {
    let mut index = ChunkMembershipIndex::default();
    index.add_module_to_chunk("x".into(), "lazy.js".into());
    index.add_module_to_chunk("y".into(), "lazy.js".into());
    let chunks = FxIndexMap::from_iter([(
      ChunkPath::from("lazy.js"),
      EcmascriptMergedChunkUpdate::Deleted { modules: vec!["x".into()] },
    )]);
    let changed = ChangedModules::compute(&FxIndexMap::default(), &chunks, &index);

    assert_eq!(changed.deleted, set(&["x", "y"]));
    assert_eq!(changed.chunks_deleted[&ChunkPath::from("lazy.js")], set(&["x", "y"]));
  }
}
