use std::collections::VecDeque;

use hotpack_common::ModuleId;
use hotpack_error::UpdateApplyError;
use hotpack_utils::indexmap::FxIndexSet;

use crate::Runtime;

/// What changing one module means for the live graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleEffect {
  /// The change reached a runtime entry without being accepted on the way.
  Unaccepted { dependency_chain: Vec<ModuleId> },
  SelfDeclined { dependency_chain: Vec<ModuleId>, module_id: ModuleId },
  /// Every path up the graph ends in a module that accepts the change.
  Accepted { module_id: ModuleId, outdated_modules: FxIndexSet<ModuleId> },
}

struct QueueItem {
  /// `None` marks the runtime of a chunk, above which nothing can accept.
  module_id: Option<ModuleId>,
  dependency_chain: Vec<ModuleId>,
}

impl Runtime {
  /// Walks from `module_id` up through its parents until every path is
  /// absorbed by a self-accepting module, or the update is found unapplicable.
  pub fn affected_module_effects(&self, module_id: &ModuleId) -> ModuleEffect {
    let mut outdated_modules = FxIndexSet::default();
    let mut queue = VecDeque::from([QueueItem {
      module_id: Some(module_id.clone()),
      dependency_chain: Vec::new(),
    }]);

    while let Some(QueueItem { module_id, dependency_chain }) = queue.pop_front() {
      let Some(module_id) = module_id else {
        return ModuleEffect::Unaccepted { dependency_chain };
      };
      // Cycles
      if !outdated_modules.insert(module_id.clone()) {
        continue;
      }

      // Never instantiated, so nothing to replace.
      let Some(module) = self.module(&module_id) else {
        continue;
      };
      if module.hot().is_self_accepted() {
        continue;
      }

      if module.hot().is_self_declined() {
        let mut dependency_chain = dependency_chain;
        dependency_chain.push(module_id.clone());
        return ModuleEffect::SelfDeclined { dependency_chain, module_id };
      }

      let mut dependency_chain = dependency_chain;
      dependency_chain.push(module_id.clone());

      if self.is_runtime_module(&module_id) {
        queue.push_back(QueueItem { module_id: None, dependency_chain });
        continue;
      }

      for parent_id in module.parents() {
        if self.module(&parent_id).is_none() {
          continue;
        }
        queue.push_back(QueueItem {
          module_id: Some(parent_id),
          dependency_chain: dependency_chain.clone(),
        });
      }
    }

    ModuleEffect::Accepted { module_id: module_id.clone(), outdated_modules }
  }

  /// Every module that has to be disposed for `invalidated` to take effect.
  /// Fails without touching the graph if any of them cannot be updated.
  pub(crate) fn compute_invalidated_modules<'a>(
    &self,
    invalidated: impl IntoIterator<Item = &'a ModuleId>,
  ) -> Result<FxIndexSet<ModuleId>, UpdateApplyError> {
    let mut outdated_modules = FxIndexSet::default();
    for module_id in invalidated {
      match self.affected_module_effects(module_id) {
        ModuleEffect::Unaccepted { dependency_chain } => {
          return Err(UpdateApplyError::unaccepted(dependency_chain));
        }
        ModuleEffect::SelfDeclined { dependency_chain, .. } => {
          return Err(UpdateApplyError::self_declined(dependency_chain));
        }
        ModuleEffect::Accepted { outdated_modules: affected, .. } => {
          outdated_modules.extend(affected);
        }
      }
    }
    Ok(outdated_modules)
  }
}
