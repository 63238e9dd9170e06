#[derive(Debug, Clone)]
pub struct NormalizedRuntimeOptions {
  pub chunk_base_path: String,
  pub asset_root: String,
}
