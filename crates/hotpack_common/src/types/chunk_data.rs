use serde::Deserialize;

use crate::{ChunkPath, ModuleId};

/// What a loader call names: either a bare chunk, or a chunk together with the
/// modules and module chunks it is known to provide.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ChunkData {
  Path(ChunkPath),
  Descriptor(ChunkDescriptor),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkDescriptor {
  pub path: ChunkPath,
  #[serde(default)]
  pub included: Vec<ModuleId>,
  #[serde(default)]
  pub excluded: Vec<ModuleId>,
  /// Finer-grained sub-bundles that together carry the same modules as `path`.
  #[serde(default)]
  pub module_chunks: Vec<ChunkPath>,
}

impl ChunkData {
  pub fn path(&self) -> &ChunkPath {
    match self {
      Self::Path(path) => path,
      Self::Descriptor(descriptor) => &descriptor.path,
    }
  }
}

impl From<ChunkPath> for ChunkData {
  fn from(value: ChunkPath) -> Self {
    Self::Path(value)
  }
}

impl From<&str> for ChunkData {
  fn from(value: &str) -> Self {
    Self::Path(value.into())
  }
}

impl From<ChunkDescriptor> for ChunkData {
  fn from(value: ChunkDescriptor) -> Self {
    Self::Descriptor(value)
  }
}

#[test]
fn test_chunk_data_deserialize() {
  let data: Vec<ChunkData> = serde_json::from_str(
    r#"["a.js", { "path": "b.js", "included": ["m1", 2], "moduleChunks": ["b-1.js"] }]"#,
  )
  .unwrap();

  assert_eq!(data[0], ChunkData::from("a.js"));
  assert_eq!(
    data[1],
    ChunkData::Descriptor(ChunkDescriptor {
      path: "b.js".into(),
      included: vec!["m1".into(), "2".into()],
      excluded: vec![],
      module_chunks: vec!["b-1.js".into()],
    })
  );
  assert_eq!(data[1].path().as_str(), "b.js");
}
