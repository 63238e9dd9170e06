use std::{
  cell::{Ref, RefCell, RefMut},
  rc::{Rc, Weak},
};

use hotpack_common::{ChunkPath, ModuleId, RuntimeOptions};
use hotpack_utils::url::encode_path_segments;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
  chunk_index::ChunkMembershipIndex,
  hot::{invalidation_queue::InvalidationQueue, HotData},
  registration::chunk_update_listener::ChunkUpdateListener,
  types::{
    module_factory::ModuleFactory, ChunkLoad, ModuleRef, SharedBackend, SharedEvaluator,
    SharedOptions,
  },
  utils::normalize_options::normalize_options,
};

/// Every table the runtime mutates. Only ever borrowed for the length of one
/// synchronous step, never across a module factory, handler or await.
#[derive(Default)]
pub(crate) struct RuntimeState {
  pub module_factories: FxHashMap<ModuleId, ModuleFactory>,
  pub module_cache: FxHashMap<ModuleId, ModuleRef>,
  /// Persisted `hot.data` between executions of a module.
  pub module_hot_data: FxHashMap<ModuleId, HotData>,
  /// Modules instantiated as part of the runtime of a chunk.
  pub runtime_modules: FxHashSet<ModuleId>,
  pub chunk_index: ChunkMembershipIndex,
  pub available_modules: FxHashMap<ModuleId, ChunkLoad>,
  pub available_module_chunks: FxHashMap<ChunkPath, ChunkLoad>,
  pub chunk_loads: FxHashMap<ChunkPath, ChunkLoad>,
  pub update_listeners: Vec<ChunkUpdateListener>,
}

pub(crate) struct RuntimeInner {
  pub options: SharedOptions,
  pub backend: SharedBackend,
  pub evaluator: SharedEvaluator,
  pub state: RefCell<RuntimeState>,
  pub invalidations: InvalidationQueue,
}

/// Handle to one runtime instance. Clones share the same module graph.
///
/// The runtime is single threaded: graph mutations happen synchronously between
/// the awaits of chunk fetches, so no other task ever observes a half applied step.
#[derive(Clone)]
pub struct Runtime {
  pub(crate) inner: Rc<RuntimeInner>,
}

#[derive(Clone)]
pub struct WeakRuntime {
  inner: Weak<RuntimeInner>,
}

impl Runtime {
  pub fn new(options: RuntimeOptions, backend: SharedBackend, evaluator: SharedEvaluator) -> Self {
    Self {
      inner: Rc::new(RuntimeInner {
        options: Rc::new(normalize_options(options)),
        backend,
        evaluator,
        state: RefCell::new(RuntimeState::default()),
        invalidations: InvalidationQueue::default(),
      }),
    }
  }

  pub fn options(&self) -> &SharedOptions {
    &self.inner.options
  }

  pub fn downgrade(&self) -> WeakRuntime {
    WeakRuntime { inner: Rc::downgrade(&self.inner) }
  }

  pub(crate) fn state(&self) -> Ref<'_, RuntimeState> {
    self.inner.state.borrow()
  }

  pub(crate) fn state_mut(&self) -> RefMut<'_, RuntimeState> {
    self.inner.state.borrow_mut()
  }

  pub(crate) fn backend(&self) -> &SharedBackend {
    &self.inner.backend
  }

  /// The live instance of a module, if it is instantiated.
  pub fn module(&self, module_id: &ModuleId) -> Option<ModuleRef> {
    self.state().module_cache.get(module_id).cloned()
  }

  pub fn has_module_factory(&self, module_id: &ModuleId) -> bool {
    self.state().module_factories.contains_key(module_id)
  }

  /// Data carried over from a disposed instance to the next one.
  pub fn hot_data(&self, module_id: &ModuleId) -> Option<HotData> {
    self.state().module_hot_data.get(module_id).cloned()
  }

  pub fn is_runtime_module(&self, module_id: &ModuleId) -> bool {
    self.state().runtime_modules.contains(module_id)
  }

  pub fn first_module_chunk(&self, module_id: &ModuleId) -> Option<ChunkPath> {
    self.state().chunk_index.first_module_chunk(module_id).cloned()
  }

  pub fn chunk_modules(&self, chunk_path: &ChunkPath) -> Vec<ModuleId> {
    self
      .state()
      .chunk_index
      .chunk_modules(chunk_path)
      .map(|modules| modules.iter().cloned().collect())
      .unwrap_or_default()
  }

  /// The URL relative to the origin where a chunk can be fetched from.
  pub fn chunk_relative_url(&self, chunk_path: &ChunkPath) -> String {
    format!("{}{}", self.inner.options.chunk_base_path, encode_path_segments(chunk_path))
  }
}

impl WeakRuntime {
  pub fn upgrade(&self) -> Option<Runtime> {
    self.inner.upgrade().map(|inner| Runtime { inner })
  }
}
