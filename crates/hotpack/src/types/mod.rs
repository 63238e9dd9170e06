pub mod module_factory;

use std::rc::Rc;

use futures::future::{LocalBoxFuture, Shared};
use hotpack_common::NormalizedRuntimeOptions;
use hotpack_error::ChunkLoadError;

use crate::{
  backend::{ModuleEvaluator, RuntimeBackend},
  module::Module,
};

pub type ModuleRef = Rc<Module>;
pub type SharedBackend = Rc<dyn RuntimeBackend>;
pub type SharedEvaluator = Rc<dyn ModuleEvaluator>;
pub type SharedOptions = Rc<NormalizedRuntimeOptions>;

/// A chunk fetch every interested caller can await. Resolves once the chunk
/// (or every chunk it stands for) is registered.
pub type ChunkLoad = Shared<LocalBoxFuture<'static, Result<(), ChunkLoadError>>>;
