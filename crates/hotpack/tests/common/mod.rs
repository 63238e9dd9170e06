#![allow(dead_code)]

use std::{
  cell::{Cell, RefCell},
  rc::Rc,
};

use anyhow::{anyhow, bail};
use futures::{
  channel::oneshot,
  executor::block_on,
  future::{self, LocalBoxFuture},
};
use hotpack::{
  module_factory, ChunkPath, ChunkRegistration, EcmascriptModuleEntry, ModuleContext,
  ModuleEvaluator, ModuleFactory, ModuleId, Runtime, RuntimeBackend, RuntimeOptions, ServerMessage,
  SharedBackend, SharedEvaluator, SourceInfo, UpdateOutcome, WeakRuntime,
};
use rustc_hash::FxHashMap;
use serde_json::Value;

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn record(log: &Log, event: impl Into<String>) {
  log.borrow_mut().push(event.into());
}

/// Serves chunks from memory and records everything the runtime asks of it.
#[derive(Default)]
pub struct TestBackend {
  runtime: RefCell<Option<WeakRuntime>>,
  contents: RefCell<FxHashMap<ChunkPath, Vec<(ModuleId, ModuleFactory)>>>,
  failures: RefCell<FxHashMap<ChunkPath, String>>,
  gates: RefCell<FxHashMap<ChunkPath, oneshot::Receiver<()>>>,
  loads: RefCell<Vec<(String, SourceInfo)>>,
  reloads: RefCell<Vec<String>>,
  unloads: RefCell<Vec<String>>,
  restarts: Cell<usize>,
}

impl TestBackend {
  pub fn attach(&self, runtime: &Runtime) {
    *self.runtime.borrow_mut() = Some(runtime.downgrade());
  }

  /// Modules the chunk registers once fetched.
  pub fn serve(&self, chunk_path: &str, modules: Vec<(&str, ModuleFactory)>) {
    let modules = modules.into_iter().map(|(id, factory)| (ModuleId::from(id), factory)).collect();
    self.contents.borrow_mut().insert(chunk_path.into(), modules);
  }

  pub fn fail(&self, chunk_path: &str, message: &str) {
    self.failures.borrow_mut().insert(chunk_path.into(), message.to_string());
  }

  pub fn heal(&self, chunk_path: &str) {
    self.failures.borrow_mut().remove(&ChunkPath::from(chunk_path));
  }

  /// The next fetch of `chunk_path` stays pending until the sender fires.
  pub fn hold(&self, chunk_path: &str) -> oneshot::Sender<()> {
    let (sender, receiver) = oneshot::channel();
    self.gates.borrow_mut().insert(chunk_path.into(), receiver);
    sender
  }

  pub fn loads(&self) -> Vec<String> {
    self.loads.borrow().iter().map(|(path, _)| path.clone()).collect()
  }

  pub fn load_sources(&self) -> Vec<SourceInfo> {
    self.loads.borrow().iter().map(|(_, source)| source.clone()).collect()
  }

  pub fn reloads(&self) -> Vec<String> {
    self.reloads.borrow().clone()
  }

  pub fn unloads(&self) -> Vec<String> {
    self.unloads.borrow().clone()
  }

  pub fn restarts(&self) -> usize {
    self.restarts.get()
  }
}

impl RuntimeBackend for TestBackend {
  fn load_chunk(
    &self,
    chunk_path: &ChunkPath,
    source: &SourceInfo,
  ) -> LocalBoxFuture<'static, anyhow::Result<()>> {
    self.loads.borrow_mut().push((chunk_path.to_string(), source.clone()));

    let gate = self.gates.borrow_mut().remove(chunk_path);
    let failure = self.failures.borrow().get(chunk_path).cloned();
    let modules = self.contents.borrow().get(chunk_path).cloned();
    let runtime = self.runtime.borrow().clone();
    let chunk_path = chunk_path.clone();
    Box::pin(async move {
      if let Some(gate) = gate {
        gate.await.map_err(|_| anyhow!("gate of {chunk_path} dropped"))?;
      }
      if let Some(failure) = failure {
        bail!(failure);
      }
      let runtime = runtime.and_then(|runtime| runtime.upgrade());
      if let (Some(runtime), Some(modules)) = (runtime, modules) {
        runtime.register_chunk(ChunkRegistration { chunk_path, modules, params: None }).await?;
      }
      Ok(())
    })
  }

  fn reload_chunk(
    &self,
    chunk_path: &ChunkPath,
  ) -> Option<LocalBoxFuture<'static, anyhow::Result<()>>> {
    self.reloads.borrow_mut().push(chunk_path.to_string());
    Some(Box::pin(future::ready(Ok(()))))
  }

  fn unload_chunk(&self, chunk_path: &ChunkPath) {
    self.unloads.borrow_mut().push(chunk_path.to_string());
  }

  fn restart(&self) {
    self.restarts.set(self.restarts.get() + 1);
  }
}

/// Looks the `code` of an update entry up among factories the test prepared.
#[derive(Default)]
pub struct TestEvaluator {
  factories: RefCell<FxHashMap<String, ModuleFactory>>,
}

impl TestEvaluator {
  pub fn define(&self, code: &str, factory: ModuleFactory) {
    self.factories.borrow_mut().insert(code.to_string(), factory);
  }
}

impl ModuleEvaluator for TestEvaluator {
  fn evaluate(
    &self,
    module_id: &ModuleId,
    entry: &EcmascriptModuleEntry,
  ) -> anyhow::Result<ModuleFactory> {
    self
      .factories
      .borrow()
      .get(&entry.code)
      .cloned()
      .ok_or_else(|| anyhow!("cannot evaluate {} for module {module_id}", entry.code))
  }
}

pub struct Harness {
  pub runtime: Runtime,
  pub backend: Rc<TestBackend>,
  pub evaluator: Rc<TestEvaluator>,
  pub log: Log,
}

impl Harness {
  pub fn new() -> Self {
    Self::with_options(RuntimeOptions::default())
  }

  pub fn with_options(options: RuntimeOptions) -> Self {
    let backend = Rc::new(TestBackend::default());
    let evaluator = Rc::new(TestEvaluator::default());
    let runtime = Runtime::new(
      options,
      Rc::clone(&backend) as SharedBackend,
      Rc::clone(&evaluator) as SharedEvaluator,
    );
    backend.attach(&runtime);
    Self { runtime, backend, evaluator, log: Log::default() }
  }

  /// Registers a chunk that carries no runtime.
  pub fn register(&self, chunk_path: &str, modules: Vec<(&str, ModuleFactory)>) {
    let modules = modules.into_iter().map(|(id, factory)| (ModuleId::from(id), factory)).collect();
    block_on(self.runtime.register_chunk(ChunkRegistration {
      chunk_path: chunk_path.into(),
      modules,
      params: None,
    }))
    .expect("registration without params cannot fail");
  }

  pub fn start(&self, module_id: &str, chunk_path: &str) -> anyhow::Result<hotpack::ModuleRef> {
    self.runtime.get_or_instantiate_runtime_module(&module_id.into(), &chunk_path.into())
  }

  pub fn update(&self, chunk_list_path: &str, message: Value) -> anyhow::Result<UpdateOutcome> {
    let message: ServerMessage = serde_json::from_value(message)?;
    self.runtime.handle_update(&chunk_list_path.into(), message)
  }

  pub fn events(&self) -> Vec<String> {
    self.log.borrow().clone()
  }

  /// A factory that logs `name` and exports `value` under `value`.
  pub fn leaf(&self, name: &'static str, value: Value) -> ModuleFactory {
    let log = Rc::clone(&self.log);
    module_factory(move |ctx: &ModuleContext| {
      record(&log, name);
      ctx.exports().set("value", value.clone());
      Ok(())
    })
  }

  /// Like [`Harness::leaf`], but the module accepts updates of itself.
  pub fn accepting_leaf(&self, name: &'static str, value: Value) -> ModuleFactory {
    let log = Rc::clone(&self.log);
    module_factory(move |ctx: &ModuleContext| {
      record(&log, name);
      ctx.hot().accept();
      ctx.exports().set("value", value.clone());
      Ok(())
    })
  }

  /// A factory that logs `name` and requires every module of `deps`.
  pub fn requiring(&self, name: &'static str, deps: &'static [&'static str]) -> ModuleFactory {
    let log = Rc::clone(&self.log);
    module_factory(move |ctx: &ModuleContext| {
      record(&log, name);
      for dep in deps {
        ctx.require(*dep)?;
      }
      Ok(())
    })
  }
}

pub fn ids(ids: &[&str]) -> Vec<ModuleId> {
  ids.iter().copied().map(ModuleId::from).collect()
}

/// A merged update that only changes code.
pub fn modify(modules: &[(&str, &str)]) -> Value {
  let entries = modules
    .iter()
    .map(|(id, code)| {
      ((*id).to_string(), serde_json::json!({ "code": code, "url": format!("{id}.js") }))
    })
    .collect::<serde_json::Map<_, _>>();
  serde_json::json!({
    "type": "partial",
    "instruction": {
      "type": "ChunkListUpdate",
      "merged": [{ "type": "EcmascriptMergedUpdate", "entries": entries }]
    }
  })
}
