use futures::future::{self, LocalBoxFuture};
use hotpack_common::{ChunkPath, EcmascriptModuleEntry, ModuleId, RuntimeParams, SourceInfo};

use crate::types::module_factory::ModuleFactory;

/// Host side of the runtime: fetches chunk bytes and reloads the page.
///
/// Fetched chunks are expected to hand their modules back through
/// [`crate::Runtime::register_chunk`] before the returned future resolves.
pub trait RuntimeBackend {
  fn register_chunk(
    &self,
    _chunk_path: &ChunkPath,
    _params: Option<&RuntimeParams>,
  ) -> LocalBoxFuture<'static, anyhow::Result<()>> {
    Box::pin(future::ready(Ok(())))
  }

  /// Must resolve to an error when the fetch fails.
  fn load_chunk(
    &self,
    chunk_path: &ChunkPath,
    source: &SourceInfo,
  ) -> LocalBoxFuture<'static, anyhow::Result<()>>;

  /// `None` when the backend cannot reload chunks in place.
  fn reload_chunk(
    &self,
    _chunk_path: &ChunkPath,
  ) -> Option<LocalBoxFuture<'static, anyhow::Result<()>>> {
    None
  }

  fn unload_chunk(&self, _chunk_path: &ChunkPath) {}

  /// Unconditional full reload.
  fn restart(&self);
}

/// Turns the fresh code carried by an update into a module factory.
pub trait ModuleEvaluator {
  fn evaluate(
    &self,
    module_id: &ModuleId,
    entry: &EcmascriptModuleEntry,
  ) -> anyhow::Result<ModuleFactory>;
}
