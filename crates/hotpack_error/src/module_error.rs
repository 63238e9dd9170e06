use std::{error::Error, fmt, sync::Arc};

use hotpack_common::ModuleId;

/// A module factory failed. The error sticks to the module instance and is
/// raised again by every later access until the instance is disposed.
#[derive(Debug, Clone)]
pub struct ModuleError {
  pub module_id: ModuleId,
  cause: Arc<anyhow::Error>,
}

impl ModuleError {
  pub fn new(module_id: ModuleId, cause: anyhow::Error) -> Self {
    Self { module_id, cause: Arc::new(cause) }
  }

  pub fn cause(&self) -> &anyhow::Error {
    &self.cause
  }

  pub fn ptr_eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.cause, &other.cause)
  }
}

impl fmt::Display for ModuleError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Module {} failed to execute: {}", self.module_id, self.cause)
  }
}

impl Error for ModuleError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(&**self.cause)
  }
}
