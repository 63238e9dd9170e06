mod protocol;
mod runtime_options;
mod types;

pub use crate::{
  protocol::{
    ChunkListUpdate, ChunkUpdate, EcmascriptMergedChunkUpdate, EcmascriptMergedUpdate,
    EcmascriptModuleEntry, MergedChunkUpdate, PartialUpdate, ResourceIdentifier, ServerMessage,
  },
  runtime_options::{
    normalized_runtime_options::NormalizedRuntimeOptions, RuntimeOptions, DEFAULT_ASSET_ROOT,
  },
  types::{
    chunk_data::{ChunkData, ChunkDescriptor},
    chunk_list::{ChunkList, ChunkListSource},
    chunk_path::ChunkPath,
    module_id::ModuleId,
    runtime_params::RuntimeParams,
    source_info::{SourceInfo, SourceType},
  },
};
