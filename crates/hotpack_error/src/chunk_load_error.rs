use std::{error::Error, fmt, sync::Arc};

use hotpack_common::{ChunkPath, SourceInfo};

/// The backend failed to fetch a chunk.
///
/// Every caller deduplicated onto the same fetch observes the same failure, hence `Clone`.
#[derive(Debug, Clone)]
pub struct ChunkLoadError {
  pub chunk_path: ChunkPath,
  pub source_info: SourceInfo,
  cause: Arc<anyhow::Error>,
}

impl ChunkLoadError {
  pub fn new(chunk_path: ChunkPath, source_info: SourceInfo, cause: anyhow::Error) -> Self {
    Self { chunk_path, source_info, cause: Arc::new(cause) }
  }

  pub fn cause(&self) -> &anyhow::Error {
    &self.cause
  }
}

impl fmt::Display for ChunkLoadError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Failed to load chunk {} {}: {}",
      self.chunk_path,
      self.source_info.load_reason(),
      self.cause
    )
  }
}

impl Error for ChunkLoadError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(&**self.cause)
  }
}

#[test]
fn test_chunk_load_error_message() {
  let error = ChunkLoadError::new(
    "a.js".into(),
    SourceInfo::parent("[project]/page.js"),
    anyhow::anyhow!("404"),
  );
  assert_eq!(error.to_string(), "Failed to load chunk a.js from module [project]/page.js: 404");
  assert_eq!(error.source().unwrap().to_string(), "404");
}
