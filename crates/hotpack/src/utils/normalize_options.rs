use hotpack_common::{NormalizedRuntimeOptions, RuntimeOptions, DEFAULT_ASSET_ROOT};

pub fn normalize_options(raw_options: RuntimeOptions) -> NormalizedRuntimeOptions {
  let asset_root = raw_options.asset_root.map_or_else(
    || DEFAULT_ASSET_ROOT.to_string(),
    |root| if root.ends_with('/') { root } else { format!("{root}/") },
  );

  NormalizedRuntimeOptions {
    chunk_base_path: raw_options.chunk_base_path.unwrap_or_default(),
    asset_root,
  }
}

#[test]
fn test_normalize_options() {
  let options = normalize_options(RuntimeOptions::default());
  assert_eq!(options.chunk_base_path, "");
  assert_eq!(options.asset_root, "/ROOT/");

  let options = normalize_options(RuntimeOptions {
    chunk_base_path: Some("/_next/".to_string()),
    asset_root: Some("/srv".to_string()),
  });
  assert_eq!(options.chunk_base_path, "/_next/");
  assert_eq!(options.asset_root, "/srv/");
}
