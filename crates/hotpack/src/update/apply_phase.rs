use hotpack_common::{ModuleId, SourceInfo};
use hotpack_utils::indexmap::{FxIndexMap, FxIndexSet};
use tracing::debug;

use crate::{
  hot::{AcceptErrorContext, AcceptErrorHandler},
  types::module_factory::ModuleFactory,
  Runtime,
};

/// An outdated module that will be instantiated again in place.
pub(crate) struct OutdatedSelfAccepted {
  pub module_id: ModuleId,
  pub error_handler: Option<AcceptErrorHandler>,
}

/// Keeps the first error of a batch; later ones are only logged.
#[derive(Default)]
pub(crate) struct ErrorReporter {
  first: Option<anyhow::Error>,
}

impl ErrorReporter {
  pub fn report(&mut self, error: anyhow::Error) {
    if self.first.is_some() {
      debug!("additional error while applying update: {error:#}");
    } else {
      self.first = Some(error);
    }
  }

  pub fn into_result(self) -> anyhow::Result<()> {
    self.first.map_or(Ok(()), Err)
  }
}

impl Runtime {
  pub(crate) fn compute_outdated_self_accepted_modules(
    &self,
    outdated_modules: &FxIndexSet<ModuleId>,
  ) -> Vec<OutdatedSelfAccepted> {
    outdated_modules
      .iter()
      .filter_map(|module_id| {
        let module = self.module(module_id)?;
        module.hot().is_self_accepted().then(|| OutdatedSelfAccepted {
          module_id: module_id.clone(),
          error_handler: module.hot().self_accepted().error_handler(),
        })
      })
      .collect()
  }

  /// Installs the new factories and instantiates every outdated self-accepted
  /// module again. A failing module never keeps the rest of the batch from
  /// being applied.
  pub(crate) fn apply_phase(
    &self,
    outdated_self_accepted: Vec<OutdatedSelfAccepted>,
    new_module_factories: FxIndexMap<ModuleId, ModuleFactory>,
    mut outdated_module_parents: FxIndexMap<ModuleId, Vec<ModuleId>>,
    reporter: &mut ErrorReporter,
  ) {
    self.state_mut().module_factories.extend(new_module_factories);

    for OutdatedSelfAccepted { module_id, error_handler } in outdated_self_accepted {
      let parents = outdated_module_parents.swap_remove(&module_id).unwrap_or_default();
      let Err(error) = self.instantiate_module(&module_id, SourceInfo::Update { parents }) else {
        continue;
      };

      let Some(error_handler) = error_handler else {
        reporter.report(error);
        continue;
      };
      let context = AcceptErrorContext { module: self.module(&module_id), module_id };
      if let Err(handler_error) = error_handler(&error, &context) {
        reporter.report(handler_error);
        reporter.report(error);
      }
    }
  }
}
