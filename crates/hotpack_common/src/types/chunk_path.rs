use std::fmt;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

/// Path of a chunk or chunk list, relative to the chunk base path.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkPath(ArcStr);

impl ChunkPath {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::ops::Deref for ChunkPath {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ChunkPath {
  fn as_ref(&self) -> &str {
    self
  }
}

impl From<&str> for ChunkPath {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl From<String> for ChunkPath {
  fn from(value: String) -> Self {
    Self::new(value)
  }
}

impl fmt::Display for ChunkPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
