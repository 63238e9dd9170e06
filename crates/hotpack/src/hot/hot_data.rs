use hotpack_utils::indexmap::FxIndexMap;
use serde_json::Value;

/// Payload one instance of a module hands to the next through its dispose handlers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HotData(FxIndexMap<String, Value>);

impl HotData {
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
    self.0.insert(key.into(), value)
  }

  pub fn remove(&mut self, key: &str) -> Option<Value> {
    self.0.shift_remove(key)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}
