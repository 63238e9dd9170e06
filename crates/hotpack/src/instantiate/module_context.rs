use hotpack_common::{ChunkData, ModuleId, SourceInfo};
use serde_json::Value;

use crate::{
  hot::Hot,
  module::exports::{ExportValue, Exports},
  types::{ChunkLoad, ModuleRef},
  Runtime,
};

/// Capabilities handed to a module factory, bound to the instance being created.
pub struct ModuleContext {
  runtime: Runtime,
  module: ModuleRef,
}

impl ModuleContext {
  pub(crate) fn new(runtime: Runtime, module: ModuleRef) -> Self {
    Self { runtime, module }
  }

  pub fn id(&self) -> &ModuleId {
    self.module.id()
  }

  pub fn module(&self) -> &ModuleRef {
    &self.module
  }

  pub fn hot(&self) -> &Hot {
    self.module.hot()
  }

  /// The current exports binding of this instance.
  pub fn exports(&self) -> Exports {
    self.module.exports()
  }

  /// CommonJS `require`: the raw exports of the module.
  pub fn require(&self, module_id: impl Into<ModuleId>) -> anyhow::Result<Exports> {
    let module = self.import_module(&module_id.into())?;
    Ok(module.exports())
  }

  /// ESM `import`: the namespace object of the module, created on first use.
  pub fn import(&self, module_id: impl Into<ModuleId>) -> anyhow::Result<Exports> {
    let module = self.import_module(&module_id.into())?;
    Ok(module.get_or_create_namespace())
  }

  fn import_module(&self, module_id: &ModuleId) -> anyhow::Result<ModuleRef> {
    let module = self.runtime.get_or_instantiate_module_from_parent(module_id, &self.module)?;
    if let Some(error) = module.error() {
      return Err(error.into());
    }
    Ok(module)
  }

  /// Dynamic import of another chunk, attributed to this module.
  pub fn load_chunk(&self, chunk_data: &ChunkData) -> ChunkLoad {
    self.runtime.load_chunk(&SourceInfo::parent(self.id().clone()), chunk_data)
  }

  /// ESM export: the exports become this module's namespace and gain `bindings`.
  pub fn esm_export<K, I>(&self, bindings: I)
  where
    K: Into<String>,
    I: IntoIterator<Item = (K, ExportValue)>,
  {
    let exports = self.module.exports();
    self.module.set_namespace_object(exports.clone());
    exports.mark_es_module();
    for (name, value) in bindings {
      exports.set(name, value);
    }
  }

  /// Re-exports every binding of `object` that this module does not define itself.
  pub fn dynamic_export(&self, object: &Exports) {
    let exports = self.module.exports();
    for name in object.keys() {
      if name != "default" && !exports.contains(&name) {
        if let Some(value) = object.get(&name) {
          exports.set(name, value);
        }
      }
    }
  }

  /// Replaces the exports with a single value, e.g. the URL of an asset.
  pub fn export_value(&self, value: ExportValue) {
    self.module.set_exports(Exports::from_value(value));
  }

  /// Replaces the exports with a namespace object built elsewhere.
  pub fn export_namespace(&self, namespace: Exports) {
    self.module.set_exports(namespace.clone());
    self.module.set_namespace_object(namespace);
  }

  pub fn resolve_absolute_path(&self, module_path: Option<&str>) -> String {
    format!("{}{}", self.runtime.options().asset_root, module_path.unwrap_or_default())
  }

  /// The URL an asset module exports, either as its `default` or as its whole value.
  pub fn resolve_path_from_module(&self, module_id: impl Into<ModuleId>) -> anyhow::Result<String> {
    let exported = self.require(module_id)?;
    let value = match exported.get("default") {
      Some(default) => default,
      None => exported.value(),
    };
    Ok(match value {
      Value::String(path) => path,
      other => other.to_string(),
    })
  }

  /// The directory-like name of this module, as `__dirname` sees it.
  pub fn dirname(&self) -> String {
    dirname(self.id()).to_string()
  }
}

/// Strips a run of two or more trailing slashes, or an id made of slashes only.
/// A single trailing slash is part of the name.
fn dirname(module_id: &str) -> &str {
  let trimmed = module_id.trim_end_matches('/');
  if trimmed.is_empty() || module_id.len() - trimmed.len() >= 2 {
    trimmed
  } else {
    module_id
  }
}

#[test]
fn test_dirname_strips_only_repeated_trailing_slashes() {
  assert_eq!(dirname("[project]/lib/index.js"), "[project]/lib/index.js");
  assert_eq!(dirname("[project]/lib/"), "[project]/lib/");
  assert_eq!(dirname("[project]/lib//"), "[project]/lib");
  assert_eq!(dirname("[project]/lib///"), "[project]/lib");
  assert_eq!(dirname("//"), "");
  assert_eq!(dirname("/"), "");
}
