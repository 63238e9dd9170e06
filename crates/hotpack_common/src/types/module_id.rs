use std::fmt;

use arcstr::ArcStr;
use serde::{Deserialize, Deserializer, Serialize};

/// `ModuleId` is the unique identifier the bundler assigned to each module.
/// - Chunks, update diffs and the live module cache all key modules by it.
/// - The wire protocol may carry numeric ids; they are kept in their decimal string form.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize)]
#[serde(transparent)]
pub struct ModuleId(ArcStr);

impl ModuleId {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::ops::Deref for ModuleId {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    self
  }
}

impl From<ArcStr> for ModuleId {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl From<&str> for ModuleId {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl From<String> for ModuleId {
  fn from(value: String) -> Self {
    Self::new(value)
  }
}

impl fmt::Display for ModuleId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl<'de> Deserialize<'de> for ModuleId {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawModuleId {
      Str(String),
      Num(u64),
    }

    Ok(match RawModuleId::deserialize(deserializer)? {
      RawModuleId::Str(value) => Self::new(value),
      RawModuleId::Num(value) => Self::new(value.to_string()),
    })
  }
}

#[test]
fn test_module_id_accepts_strings_and_numbers() {
  let ids: Vec<ModuleId> = serde_json::from_str(r#"["[project]/app.js", 42]"#).unwrap();
  assert_eq!(ids, vec![ModuleId::from("[project]/app.js"), ModuleId::from("42")]);
}
