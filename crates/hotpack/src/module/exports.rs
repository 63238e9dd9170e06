use std::{cell::RefCell, fmt, rc::Rc};

use serde_json::{Map, Value};

pub type ExportValue = Value;

const ES_MODULE_MARKER: &str = "__esModule";

/// The binding object a module hands to its importers.
///
/// Cloning shares the binding: an importer holding an `Exports` observes later
/// writes of the module that owns it, but never a replacement instance.
#[derive(Clone)]
pub struct Exports(Rc<RefCell<Value>>);

impl Exports {
  pub fn new() -> Self {
    Self::from_value(Value::Object(Map::new()))
  }

  pub fn from_value(value: ExportValue) -> Self {
    Self(Rc::new(RefCell::new(value)))
  }

  pub fn get(&self, name: &str) -> Option<ExportValue> {
    self.0.borrow().get(name).cloned()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.0.borrow().get(name).is_some()
  }

  /// Writes a named binding. Exports that were replaced by a non-object value
  /// have no named bindings, so the write is dropped.
  pub fn set(&self, name: impl Into<String>, value: ExportValue) {
    if let Value::Object(map) = &mut *self.0.borrow_mut() {
      map.insert(name.into(), value);
    }
  }

  pub fn keys(&self) -> Vec<String> {
    match &*self.0.borrow() {
      Value::Object(map) => map.keys().cloned().collect(),
      _ => Vec::new(),
    }
  }

  pub fn value(&self) -> ExportValue {
    self.0.borrow().clone()
  }

  pub fn is_es_module(&self) -> bool {
    matches!(self.get(ES_MODULE_MARKER), Some(Value::Bool(true)))
  }

  pub(crate) fn mark_es_module(&self) {
    self.set(ES_MODULE_MARKER, Value::Bool(true));
  }

  pub fn ptr_eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }
}

impl Default for Exports {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Exports {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Exports").field(&*self.0.borrow()).finish()
  }
}

/// Exposes the bindings of CommonJS-style `raw` exports on the namespace `ns`.
///
/// `raw` itself becomes the `default` binding unless it is flagged as an ES
/// module that already carries its own `default`.
pub fn interop_esm(raw: &Exports, ns: &Exports, allow_export_default: bool) {
  if raw.ptr_eq(ns) {
    return;
  }
  let raw_value = raw.value();
  if let Value::Object(map) = &raw_value {
    for (key, value) in map {
      ns.set(key.clone(), value.clone());
    }
  }
  if !(allow_export_default && raw.contains("default")) {
    ns.set("default", raw_value);
  }
  ns.mark_es_module();
}
