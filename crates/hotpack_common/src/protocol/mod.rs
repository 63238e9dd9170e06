//! Server to client messages of the update protocol.
//!
//! The shapes mirror the JSON the update server sends for a subscribed chunk
//! list, so field and tag names must stay as they are.

use hotpack_utils::indexmap::FxIndexMap;
use serde::Deserialize;

use crate::{ChunkPath, ModuleId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResourceIdentifier {
  pub path: String,
  #[serde(default)]
  pub headers: Option<FxIndexMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
  /// The update can be applied to the current state of the application.
  Partial {
    instruction: PartialUpdate,
    #[serde(default)]
    resource: Option<ResourceIdentifier>,
  },
  /// The application must be restarted.
  Restart {
    #[serde(default)]
    resource: Option<ResourceIdentifier>,
  },
  /// The chunk list no longer exists.
  NotFound {
    #[serde(default)]
    resource: Option<ResourceIdentifier>,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum PartialUpdate {
  ChunkListUpdate(ChunkListUpdate),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChunkListUpdate {
  #[serde(default)]
  pub merged: Vec<MergedChunkUpdate>,
  #[serde(default)]
  pub chunks: FxIndexMap<ChunkPath, ChunkUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChunkUpdate {
  Added,
  Deleted,
  Total,
  Partial {
    #[serde(default)]
    instruction: serde_json::Value,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum MergedChunkUpdate {
  EcmascriptMergedUpdate(EcmascriptMergedUpdate),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EcmascriptMergedUpdate {
  #[serde(default)]
  pub entries: FxIndexMap<ModuleId, EcmascriptModuleEntry>,
  #[serde(default)]
  pub chunks: FxIndexMap<ChunkPath, EcmascriptMergedChunkUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EcmascriptMergedChunkUpdate {
  Added {
    #[serde(default)]
    modules: Vec<ModuleId>,
  },
  Deleted {
    #[serde(default)]
    modules: Vec<ModuleId>,
  },
  Partial {
    #[serde(default)]
    added: Vec<ModuleId>,
    #[serde(default)]
    deleted: Vec<ModuleId>,
  },
}

/// Fresh code for one module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EcmascriptModuleEntry {
  pub code: String,
  pub url: String,
  #[serde(default)]
  pub map: Option<String>,
}
