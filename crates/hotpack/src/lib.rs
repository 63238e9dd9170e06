mod backend;
mod chunk_index;
mod hot;
mod instantiate;
mod loader;
mod module;
mod registration;
mod runtime;
mod types;
mod update;
mod utils;

pub use crate::{
  backend::{ModuleEvaluator, RuntimeBackend},
  chunk_index::ChunkMembershipIndex,
  hot::{
    AcceptErrorContext, AcceptErrorHandler, DisposeHandler, Hot, HotData, HotStatus, SelfAccepted,
    StatusHandler,
  },
  instantiate::module_context::ModuleContext,
  module::{
    exports::{interop_esm, ExportValue, Exports},
    Module,
  },
  registration::{
    chunk_list_provider::ChunkListProvider, chunk_update_listener::ChunkUpdateListener,
    ChunkRegistration,
  },
  runtime::{Runtime, WeakRuntime},
  types::{
    module_factory::{module_factory, ModuleFactory},
    ChunkLoad, ModuleRef, SharedBackend, SharedEvaluator, SharedOptions,
  },
  update::{
    changed_modules::ChangedModules, module_effect::ModuleEffect,
    pending_chunk_updates::PendingChunkUpdates, UpdateOutcome,
  },
};
pub use hotpack_common::*;
pub use hotpack_error::*;
