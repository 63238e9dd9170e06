use serde::Deserialize;

use crate::{ChunkData, ModuleId};

/// Bootstrap parameters carried by a chunk that contains a runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeParams {
  #[serde(default)]
  pub other_chunks: Vec<ChunkData>,
  #[serde(default)]
  pub runtime_module_ids: Vec<ModuleId>,
}
