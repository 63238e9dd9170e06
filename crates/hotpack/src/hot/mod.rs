mod hot_data;
pub(crate) mod invalidation_queue;

use std::{
  cell::{Cell, RefCell},
  fmt,
  rc::Rc,
};

use futures::future::{self, Ready};
use hotpack_common::ModuleId;
use hotpack_error::UnsupportedHotApi;

use crate::types::ModuleRef;

pub use self::hot_data::HotData;
use self::invalidation_queue::InvalidationQueue;

pub type DisposeHandler = Rc<dyn Fn(&mut HotData)>;
pub type StatusHandler = Rc<dyn Fn(HotStatus)>;
/// Receives the error of a failed re-instantiation of a self-accepted module.
pub type AcceptErrorHandler = Rc<dyn Fn(&anyhow::Error, &AcceptErrorContext) -> anyhow::Result<()>>;

pub struct AcceptErrorContext {
  pub module_id: ModuleId,
  /// The failed instance, still holding its sticky error.
  pub module: Option<ModuleRef>,
}

#[derive(Clone, Default)]
pub enum SelfAccepted {
  #[default]
  No,
  Yes,
  WithErrorHandler(AcceptErrorHandler),
}

impl SelfAccepted {
  pub fn is_accepted(&self) -> bool {
    !matches!(self, Self::No)
  }

  pub fn error_handler(&self) -> Option<AcceptErrorHandler> {
    match self {
      Self::WithErrorHandler(handler) => Some(Rc::clone(handler)),
      Self::No | Self::Yes => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotStatus {
  Idle,
}

#[derive(Default)]
pub(crate) struct HotState {
  pub self_accepted: SelfAccepted,
  pub self_declined: bool,
  pub self_invalidated: bool,
  pub dispose_handlers: Vec<DisposeHandler>,
}

/// The hot module API a module sees as `module.hot`. Fresh for every instance.
#[derive(Clone)]
pub struct Hot {
  module_id: ModuleId,
  active: Rc<Cell<bool>>,
  data: HotData,
  state: Rc<RefCell<HotState>>,
  invalidations: InvalidationQueue,
}

impl Hot {
  pub(crate) fn new(module_id: ModuleId, data: HotData, invalidations: InvalidationQueue) -> Self {
    Self {
      module_id,
      active: Rc::new(Cell::new(true)),
      data,
      state: Rc::new(RefCell::new(HotState::default())),
      invalidations,
    }
  }

  /// `false` once the instance was disposed by an update.
  pub fn is_active(&self) -> bool {
    self.active.get()
  }

  pub(crate) fn deactivate(&self) {
    self.active.set(false);
  }

  /// What the previous instance left behind in its dispose handlers.
  pub fn data(&self) -> &HotData {
    &self.data
  }

  /// Survive updates in place: the module is re-executed without its parents.
  pub fn accept(&self) {
    self.state.borrow_mut().self_accepted = SelfAccepted::Yes;
  }

  pub fn accept_with_error_handler<F>(&self, handler: F)
  where
    F: Fn(&anyhow::Error, &AcceptErrorContext) -> anyhow::Result<()> + 'static,
  {
    self.state.borrow_mut().self_accepted = SelfAccepted::WithErrorHandler(Rc::new(handler));
  }

  /// Accepting updates of dependencies is not supported.
  pub fn accept_dependencies(&self, _dependencies: &[ModuleId]) -> anyhow::Result<()> {
    Err(UnsupportedHotApi::AcceptSignature.into())
  }

  pub fn decline(&self) {
    self.state.borrow_mut().self_declined = true;
  }

  pub fn decline_dependencies(&self, _dependencies: &[ModuleId]) -> anyhow::Result<()> {
    Err(UnsupportedHotApi::DeclineSignature.into())
  }

  /// Registers `callback` to run right before this instance is torn down and
  /// returns the handler so it can be removed again.
  pub fn dispose<F>(&self, callback: F) -> DisposeHandler
  where
    F: Fn(&mut HotData) + 'static,
  {
    let handler: DisposeHandler = Rc::new(callback);
    self.add_dispose_handler(Rc::clone(&handler));
    handler
  }

  pub fn add_dispose_handler(&self, handler: DisposeHandler) {
    self.state.borrow_mut().dispose_handlers.push(handler);
  }

  pub fn remove_dispose_handler(&self, handler: &DisposeHandler) {
    let mut state = self.state.borrow_mut();
    if let Some(idx) = state.dispose_handlers.iter().position(|h| Rc::ptr_eq(h, handler)) {
      state.dispose_handlers.remove(idx);
    }
  }

  /// Withdraws a previous accept: the next update pass treats this module as
  /// changed and propagates to its parents.
  pub fn invalidate(&self) {
    self.state.borrow_mut().self_invalidated = true;
    self.invalidations.push(self.module_id.clone());
  }

  #[allow(clippy::unused_self)]
  pub fn status(&self) -> HotStatus {
    HotStatus::Idle
  }

  // The status never changes, so there is nothing to notify.
  pub fn add_status_handler(&self, _handler: &StatusHandler) {}

  pub fn remove_status_handler(&self, _handler: &StatusHandler) {}

  /// Updates are pushed by the server; there is never anything to pull.
  #[allow(clippy::unused_self)]
  pub fn check(&self) -> Ready<Option<Vec<ModuleId>>> {
    future::ready(None)
  }

  pub(crate) fn is_self_accepted(&self) -> bool {
    let state = self.state.borrow();
    state.self_accepted.is_accepted() && !state.self_invalidated
  }

  pub(crate) fn is_self_declined(&self) -> bool {
    self.state.borrow().self_declined
  }

  pub(crate) fn self_accepted(&self) -> SelfAccepted {
    self.state.borrow().self_accepted.clone()
  }

  pub(crate) fn dispose_handlers(&self) -> Vec<DisposeHandler> {
    self.state.borrow().dispose_handlers.clone()
  }
}

impl fmt::Debug for Hot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.state.borrow();
    f.debug_struct("Hot")
      .field("module_id", &self.module_id)
      .field("active", &self.active.get())
      .field("self_accepted", &state.self_accepted.is_accepted())
      .field("self_declined", &state.self_declined)
      .field("self_invalidated", &state.self_invalidated)
      .field("dispose_handlers", &state.dispose_handlers.len())
      .finish_non_exhaustive()
  }
}
