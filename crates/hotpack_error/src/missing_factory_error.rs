use std::{error::Error, fmt};

use hotpack_common::{ModuleId, SourceInfo};

#[derive(Debug, Clone)]
pub struct MissingFactoryError {
  pub module_id: ModuleId,
  pub source_info: SourceInfo,
}

impl MissingFactoryError {
  pub fn new(module_id: ModuleId, source_info: SourceInfo) -> Self {
    Self { module_id, source_info }
  }
}

impl fmt::Display for MissingFactoryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // This can happen if modules incorrectly handle HMR disposes/updates, e.g. when they keep a
    // timer around which still executes old code and requires a module that is gone.
    write!(
      f,
      "Module {} was instantiated {}, but the module factory is not available. It might have been deleted in an HMR update.",
      self.module_id,
      self.source_info.instantiation_reason()
    )
  }
}

impl Error for MissingFactoryError {}
