use std::rc::Rc;

use crate::instantiate::module_context::ModuleContext;

/// The compiled body of one module. It runs once per live instance and talks to
/// the runtime only through the [`ModuleContext`] it is handed.
pub type ModuleFactory = Rc<dyn Fn(&ModuleContext) -> anyhow::Result<()>>;

pub fn module_factory<F>(factory: F) -> ModuleFactory
where
  F: Fn(&ModuleContext) -> anyhow::Result<()> + 'static,
{
  Rc::new(factory)
}
