pub mod module_context;

use std::rc::Rc;

use hotpack_common::{ChunkPath, ModuleId, SourceInfo};
use hotpack_error::{MissingFactoryError, ModuleError};
use tracing::warn;

use crate::{hot::Hot, module::Module, types::ModuleRef, Runtime};

use self::module_context::ModuleContext;

impl Runtime {
  /// Runs the factory of `module_id` into a fresh instance and caches it.
  ///
  /// The instance is cached before the factory runs so the factory can register
  /// hot handlers and import itself through a cycle. A failing factory leaves
  /// its error on the cached instance.
  pub(crate) fn instantiate_module(
    &self,
    module_id: &ModuleId,
    source: SourceInfo,
  ) -> anyhow::Result<ModuleRef> {
    let (factory, hot_data) = {
      let state = self.state();
      let Some(factory) = state.module_factories.get(module_id).cloned() else {
        return Err(MissingFactoryError::new(module_id.clone(), source).into());
      };
      (factory, state.module_hot_data.get(module_id).cloned().unwrap_or_default())
    };

    let hot = Hot::new(module_id.clone(), hot_data, self.inner.invalidations.clone());

    let parents = match source {
      SourceInfo::Runtime { .. } => {
        self.state_mut().runtime_modules.insert(module_id.clone());
        Vec::new()
      }
      // The parent already lists this module as a child, see `get_or_instantiate_module_from_parent`.
      SourceInfo::Parent { parent_id } => vec![parent_id],
      SourceInfo::Update { parents } => parents,
    };

    let module = Rc::new(Module::new(module_id.clone(), parents, hot));
    self.state_mut().module_cache.insert(module_id.clone(), Rc::clone(&module));

    let context = ModuleContext::new(self.clone(), Rc::clone(&module));
    if let Err(cause) = factory(&context) {
      let error = ModuleError::new(module_id.clone(), cause);
      module.set_error(error.clone());
      return Err(error.into());
    }

    module.finish_loading();
    Ok(module)
  }

  /// Returns the cached instance of `module_id`, recording the import edge from
  /// `source_module`, or instantiates it with `source_module` as its parent.
  pub(crate) fn get_or_instantiate_module_from_parent(
    &self,
    module_id: &ModuleId,
    source_module: &ModuleRef,
  ) -> anyhow::Result<ModuleRef> {
    if !source_module.hot().is_active() {
      warn!(
        "Unexpected import of module {module_id} from module {}, which was deleted by an HMR update",
        source_module.id()
      );
    }

    let cached = self.module(module_id);
    source_module.add_child(module_id);

    if let Some(module) = cached {
      if !module.hot().is_active() {
        warn!(
          "Unexpected import of module {module_id} from module {}, module {module_id} was deleted by an HMR update",
          source_module.id()
        );
      }
      module.add_parent(source_module.id());
      return Ok(module);
    }

    self.instantiate_module(module_id, SourceInfo::parent(source_module.id().clone()))
  }

  pub fn instantiate_runtime_module(
    &self,
    module_id: &ModuleId,
    chunk_path: &ChunkPath,
  ) -> anyhow::Result<ModuleRef> {
    self.instantiate_module(module_id, SourceInfo::runtime(chunk_path.clone()))
  }

  /// Like [`Runtime::instantiate_runtime_module`], but a cached instance is
  /// returned as is, or its sticky error raised again.
  pub fn get_or_instantiate_runtime_module(
    &self,
    module_id: &ModuleId,
    chunk_path: &ChunkPath,
  ) -> anyhow::Result<ModuleRef> {
    if let Some(module) = self.module(module_id) {
      if let Some(error) = module.error() {
        return Err(error.into());
      }
      return Ok(module);
    }

    self.instantiate_runtime_module(module_id, chunk_path)
  }
}
