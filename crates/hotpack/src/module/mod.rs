pub mod exports;

use std::cell::{Cell, RefCell};

use hotpack_common::ModuleId;
use hotpack_error::ModuleError;
use hotpack_utils::indexmap::FxIndexSet;

use crate::hot::Hot;

use self::exports::{interop_esm, Exports};

/// One live instance of a module.
///
/// Parent and child edges are module ids, never references, so disposing an
/// instance cannot leave another one pointing at freed state.
#[derive(Debug)]
pub struct Module {
  id: ModuleId,
  exports: RefCell<Exports>,
  namespace_object: RefCell<Option<Exports>>,
  error: RefCell<Option<ModuleError>>,
  loaded: Cell<bool>,
  parents: RefCell<FxIndexSet<ModuleId>>,
  children: RefCell<FxIndexSet<ModuleId>>,
  hot: Hot,
}

impl Module {
  pub(crate) fn new(id: ModuleId, parents: Vec<ModuleId>, hot: Hot) -> Self {
    Self {
      id,
      exports: RefCell::new(Exports::new()),
      namespace_object: RefCell::new(None),
      error: RefCell::new(None),
      loaded: Cell::new(false),
      parents: RefCell::new(parents.into_iter().collect()),
      children: RefCell::new(FxIndexSet::default()),
      hot,
    }
  }

  pub fn id(&self) -> &ModuleId {
    &self.id
  }

  pub fn exports(&self) -> Exports {
    self.exports.borrow().clone()
  }

  pub fn namespace_object(&self) -> Option<Exports> {
    self.namespace_object.borrow().clone()
  }

  pub fn error(&self) -> Option<ModuleError> {
    self.error.borrow().clone()
  }

  pub fn is_loaded(&self) -> bool {
    self.loaded.get()
  }

  pub fn parents(&self) -> Vec<ModuleId> {
    self.parents.borrow().iter().cloned().collect()
  }

  pub fn children(&self) -> Vec<ModuleId> {
    self.children.borrow().iter().cloned().collect()
  }

  pub fn hot(&self) -> &Hot {
    &self.hot
  }

  pub(crate) fn set_exports(&self, exports: Exports) {
    *self.exports.borrow_mut() = exports;
  }

  pub(crate) fn set_namespace_object(&self, namespace: Exports) {
    *self.namespace_object.borrow_mut() = Some(namespace);
  }

  pub(crate) fn set_error(&self, error: ModuleError) {
    *self.error.borrow_mut() = Some(error);
  }

  pub(crate) fn add_parent(&self, parent_id: &ModuleId) {
    if !self.parents.borrow().contains(parent_id) {
      self.parents.borrow_mut().insert(parent_id.clone());
    }
  }

  pub(crate) fn remove_parent(&self, parent_id: &ModuleId) {
    self.parents.borrow_mut().shift_remove(parent_id);
  }

  pub(crate) fn add_child(&self, child_id: &ModuleId) {
    if !self.children.borrow().contains(child_id) {
      self.children.borrow_mut().insert(child_id.clone());
    }
  }

  /// Marks a successful factory run. If the factory produced a namespace object
  /// separate from its raw exports (cjs -> esm -> cjs cycles), the namespace is
  /// brought up to date with the final exports.
  pub(crate) fn finish_loading(&self) {
    self.loaded.set(true);
    let exports = self.exports();
    if let Some(namespace) = self.namespace_object() {
      if !exports.ptr_eq(&namespace) {
        interop_esm(&exports, &namespace, false);
      }
    }
  }

  /// The ESM view of this module's exports, created on first request.
  pub(crate) fn get_or_create_namespace(&self) -> Exports {
    if let Some(namespace) = self.namespace_object() {
      return namespace;
    }
    let raw = self.exports();
    let namespace = Exports::new();
    interop_esm(&raw, &namespace, raw.is_es_module());
    self.set_namespace_object(namespace.clone());
    namespace
  }
}
