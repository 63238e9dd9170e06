use std::fmt::Display;

use crate::{ChunkPath, ModuleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
  Runtime,
  Parent,
  Update,
}

/// Why a module instantiation or chunk load was started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceInfo {
  /// The module was instantiated because it was included in an evaluated chunk's runtime.
  Runtime { chunk_path: ChunkPath },
  /// The module was instantiated because a parent module imported it.
  Parent { parent_id: ModuleId },
  /// The module was instantiated because it was included in a hot module update.
  Update { parents: Vec<ModuleId> },
}

impl SourceInfo {
  pub fn runtime(chunk_path: impl Into<ChunkPath>) -> Self {
    Self::Runtime { chunk_path: chunk_path.into() }
  }

  pub fn parent(parent_id: impl Into<ModuleId>) -> Self {
    Self::Parent { parent_id: parent_id.into() }
  }

  pub fn update() -> Self {
    Self::Update { parents: Vec::new() }
  }

  pub fn source_type(&self) -> SourceType {
    match self {
      Self::Runtime { .. } => SourceType::Runtime,
      Self::Parent { .. } => SourceType::Parent,
      Self::Update { .. } => SourceType::Update,
    }
  }

  /// Completes "Failed to load chunk {path} ...".
  pub fn load_reason(&self) -> String {
    match self {
      Self::Runtime { chunk_path } => format!("as a runtime dependency of chunk {chunk_path}"),
      Self::Parent { parent_id } => format!("from module {parent_id}"),
      Self::Update { .. } => "from an HMR update".to_string(),
    }
  }

  /// Completes "Module {id} was instantiated ...".
  pub fn instantiation_reason(&self) -> String {
    match self {
      Self::Runtime { chunk_path } => format!("as a runtime entry of chunk {chunk_path}"),
      Self::Parent { parent_id } => format!("because it was required from module {parent_id}"),
      Self::Update { .. } => "because of an HMR update".to_string(),
    }
  }
}

impl Display for SourceType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Runtime => write!(f, "runtime"),
      Self::Parent => write!(f, "parent"),
      Self::Update => write!(f, "update"),
    }
  }
}

#[test]
fn test_reasons() {
  assert_eq!(
    SourceInfo::runtime("main.js").load_reason(),
    "as a runtime dependency of chunk main.js"
  );
  assert_eq!(SourceInfo::parent("a").load_reason(), "from module a");
  assert_eq!(SourceInfo::update().load_reason(), "from an HMR update");
  assert_eq!(
    SourceInfo::parent("a").instantiation_reason(),
    "because it was required from module a"
  );
}
