mod chunk_load_error;
mod missing_factory_error;
mod module_error;
mod unsupported_hot_api;
mod update_apply_error;

pub use crate::{
  chunk_load_error::ChunkLoadError,
  missing_factory_error::MissingFactoryError,
  module_error::ModuleError,
  unsupported_hot_api::UnsupportedHotApi,
  update_apply_error::{UpdateApplyError, UpdateRejection},
};
