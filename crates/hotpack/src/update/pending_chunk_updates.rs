use futures::future::{try_join_all, LocalBoxFuture};

/// Chunk directives of an applied update that still wait for the backend.
#[derive(Default)]
#[must_use = "chunk directives only complete when awaited"]
pub struct PendingChunkUpdates(Vec<LocalBoxFuture<'static, anyhow::Result<()>>>);

impl PendingChunkUpdates {
  pub(crate) fn push(&mut self, update: LocalBoxFuture<'static, anyhow::Result<()>>) {
    self.0.push(update);
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Resolves once every directive settled, with the first failure if any.
  pub async fn settle(self) -> anyhow::Result<()> {
    try_join_all(self.0).await?;
    Ok(())
  }
}

impl std::fmt::Debug for PendingChunkUpdates {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("PendingChunkUpdates").field(&self.0.len()).finish()
  }
}
