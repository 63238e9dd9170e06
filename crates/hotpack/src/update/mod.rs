pub(crate) mod apply_phase;
pub mod changed_modules;
pub(crate) mod dispose_phase;
pub mod module_effect;
pub mod pending_chunk_updates;

use futures::FutureExt;
use hotpack_common::{
  ChunkListUpdate, ChunkPath, ChunkUpdate, EcmascriptMergedUpdate, MergedChunkUpdate, ModuleId,
  PartialUpdate, ServerMessage, SourceInfo,
};
use hotpack_error::UnsupportedHotApi;
use hotpack_utils::indexmap::{FxIndexMap, FxIndexSet};
use tracing::debug;

use crate::{types::module_factory::ModuleFactory, Runtime};

use self::{
  apply_phase::ErrorReporter, changed_modules::ChangedModules,
  pending_chunk_updates::PendingChunkUpdates,
};

/// What handling one server message did to the application.
#[derive(Debug)]
#[must_use]
pub enum UpdateOutcome {
  /// The graph was updated. Chunk directives may still be in flight.
  Applied(PendingChunkUpdates),
  /// The backend was asked to reload everything.
  Restarted,
  /// A dynamic chunk list vanished and was torn down. `existed` is `false` if
  /// it was never registered.
  ChunkListDisposed { existed: bool },
}

impl Runtime {
  /// Entry point for every message the update server sends about `chunk_list_path`.
  ///
  /// Every graph mutation happens before this returns, so messages are applied
  /// strictly in call order. A rejected update leaves the graph untouched and
  /// surfaces as an [`hotpack_error::UpdateApplyError`]; restarting is up to the caller.
  pub fn handle_update(
    &self,
    chunk_list_path: &ChunkPath,
    message: ServerMessage,
  ) -> anyhow::Result<UpdateOutcome> {
    match message {
      ServerMessage::Partial { instruction, .. } => {
        self.apply_update(instruction).map(UpdateOutcome::Applied)
      }
      ServerMessage::Restart { .. } => {
        debug!(chunk_list = %chunk_list_path, "server requested a restart");
        self.backend().restart();
        Ok(UpdateOutcome::Restarted)
      }
      ServerMessage::NotFound { .. } => {
        // A vanished entry point cannot be patched, a dynamic import boundary can simply go.
        if self.state().chunk_index.is_runtime_chunk_list(chunk_list_path) {
          debug!(chunk_list = %chunk_list_path, "runtime chunk list not found, restarting");
          self.backend().restart();
          Ok(UpdateOutcome::Restarted)
        } else {
          let existed = self.dispose_chunk_list(chunk_list_path);
          Ok(UpdateOutcome::ChunkListDisposed { existed })
        }
      }
    }
  }

  pub fn apply_update(&self, update: PartialUpdate) -> anyhow::Result<PendingChunkUpdates> {
    match update {
      PartialUpdate::ChunkListUpdate(update) => self.apply_chunk_list_update(update),
    }
  }

  fn apply_chunk_list_update(&self, update: ChunkListUpdate) -> anyhow::Result<PendingChunkUpdates> {
    let ChunkListUpdate { merged, chunks } = update;

    // Rejected up front so that an unknown directive never follows an applied merge.
    if let Some(instruction) = chunks.values().find_map(|chunk_update| match chunk_update {
      ChunkUpdate::Partial { instruction } => Some(instruction),
      ChunkUpdate::Added | ChunkUpdate::Deleted | ChunkUpdate::Total => None,
    }) {
      return Err(UnsupportedHotApi::PartialChunkInstruction(instruction.clone()).into());
    }

    for merged in merged {
      match merged {
        MergedChunkUpdate::EcmascriptMergedUpdate(update) => {
          self.apply_ecmascript_merged_update(&update)?;
        }
      }
    }

    let mut pending = PendingChunkUpdates::default();
    for (chunk_path, chunk_update) in chunks {
      match chunk_update {
        ChunkUpdate::Added => {
          let load = self.load_chunk_path(&SourceInfo::update(), &chunk_path);
          pending.push(load.map(|result| result.map_err(anyhow::Error::from)).boxed_local());
        }
        ChunkUpdate::Total => {
          if let Some(reload) = self.backend().reload_chunk(&chunk_path) {
            pending.push(reload);
          }
        }
        ChunkUpdate::Deleted => self.unload_chunk(&chunk_path),
        ChunkUpdate::Partial { .. } => {}
      }
    }
    Ok(pending)
  }

  fn apply_ecmascript_merged_update(&self, update: &EcmascriptMergedUpdate) -> anyhow::Result<()> {
    let ChangedModules { added, modified, chunks_added, chunks_deleted, .. } =
      ChangedModules::compute(&update.entries, &update.chunks, &self.state().chunk_index);

    let outdated_modules = self.compute_invalidated_modules(modified.keys())?;

    let mut new_module_factories = FxIndexMap::default();
    let added_entries = added.iter().filter_map(|(id, entry)| Some((id, entry.as_ref()?)));
    for (module_id, entry) in added_entries.chain(&modified) {
      let factory = self.inner.evaluator.evaluate(module_id, entry)?;
      new_module_factories.insert(module_id.clone(), factory);
    }

    let disposed_modules = self.update_chunks_phase(&chunks_added, &chunks_deleted);
    debug!(
      added = added.len(),
      modified = modified.len(),
      outdated = outdated_modules.len(),
      disposed = disposed_modules.len(),
      "applying merged update"
    );

    self.apply_internal(outdated_modules, disposed_modules, new_module_factories)
  }

  /// Disposes and re-instantiates until no module invalidated itself during
  /// the last pass.
  fn apply_internal(
    &self,
    mut outdated_modules: FxIndexSet<ModuleId>,
    mut disposed_modules: Vec<ModuleId>,
    mut new_module_factories: FxIndexMap<ModuleId, ModuleFactory>,
  ) -> anyhow::Result<()> {
    loop {
      let invalidated = self.inner.invalidations.take();
      if !invalidated.is_empty() {
        debug!(invalidated = invalidated.len(), "folding invalidated modules into update");
        outdated_modules.extend(self.compute_invalidated_modules(&invalidated)?);
      }

      // A module that left its last chunk is only cleared, never re-instantiated.
      outdated_modules.retain(|module_id| !disposed_modules.contains(module_id));
      let outdated_self_accepted = self.compute_outdated_self_accepted_modules(&outdated_modules);
      let outdated_module_parents = self.dispose_phase(&outdated_modules, &disposed_modules);

      let mut reporter = ErrorReporter::default();
      self.apply_phase(
        outdated_self_accepted,
        std::mem::take(&mut new_module_factories),
        outdated_module_parents,
        &mut reporter,
      );
      reporter.into_result()?;

      if self.inner.invalidations.is_empty() {
        return Ok(());
      }
      outdated_modules.clear();
      disposed_modules.clear();
    }
  }
}
