use std::{cell::RefCell, rc::Rc};

use hotpack_common::ModuleId;
use hotpack_utils::indexmap::FxIndexSet;

/// Modules that called `hot.invalidate()` and must be part of the next update pass.
#[derive(Debug, Clone, Default)]
pub(crate) struct InvalidationQueue(Rc<RefCell<FxIndexSet<ModuleId>>>);

impl InvalidationQueue {
  pub fn push(&self, module_id: ModuleId) {
    self.0.borrow_mut().insert(module_id);
  }

  pub fn is_empty(&self) -> bool {
    self.0.borrow().is_empty()
  }

  pub fn take(&self) -> FxIndexSet<ModuleId> {
    std::mem::take(&mut *self.0.borrow_mut())
  }
}
