pub mod normalized_runtime_options;

use serde::Deserialize;

pub const DEFAULT_ASSET_ROOT: &str = "/ROOT/";

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeOptions {
  /// Prefix of every chunk URL handed to the backend.
  pub chunk_base_path: Option<String>,
  /// Root that module-relative asset paths are resolved against.
  pub asset_root: Option<String>,
}
