use std::{error::Error, fmt};

use hotpack_common::ModuleId;
use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateRejection {
  /// The walk reached a runtime entry without finding a module that accepts the update.
  Unaccepted,
  /// A module on the walk declared it can never be hot updated.
  SelfDeclined,
}

/// A diff could not be applied. Nothing was disposed; the caller decides
/// between a full restart and ignoring the update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateApplyError {
  pub rejection: UpdateRejection,
  pub dependency_chain: Vec<ModuleId>,
}

impl UpdateApplyError {
  pub fn unaccepted(dependency_chain: Vec<ModuleId>) -> Self {
    Self { rejection: UpdateRejection::Unaccepted, dependency_chain }
  }

  pub fn self_declined(dependency_chain: Vec<ModuleId>) -> Self {
    Self { rejection: UpdateRejection::SelfDeclined, dependency_chain }
  }
}

impl fmt::Display for UpdateRejection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Unaccepted => write!(f, "unaccepted"),
      Self::SelfDeclined => write!(f, "self-declined"),
    }
  }
}

impl fmt::Display for UpdateApplyError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "cannot apply update: {} module. Dependency chain: {}.",
      self.rejection,
      self.dependency_chain.iter().join(" -> ")
    )
  }
}

impl Error for UpdateApplyError {}

#[test]
fn test_update_apply_error_message() {
  let error = UpdateApplyError::unaccepted(vec!["b".into(), "a".into()]);
  assert_eq!(error.to_string(), "cannot apply update: unaccepted module. Dependency chain: b -> a.");

  let error = UpdateApplyError::self_declined(vec!["2".into()]);
  assert_eq!(error.to_string(), "cannot apply update: self-declined module. Dependency chain: 2.");
}
