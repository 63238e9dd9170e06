use std::{error::Error, fmt};

/// A module or the update server used a part of the hot API this runtime does not implement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedHotApi {
  AcceptSignature,
  DeclineSignature,
  PartialChunkInstruction(serde_json::Value),
}

impl fmt::Display for UnsupportedHotApi {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::AcceptSignature => write!(f, "unsupported `accept` signature"),
      Self::DeclineSignature => write!(f, "unsupported `decline` signature"),
      Self::PartialChunkInstruction(instruction) => {
        write!(f, "Unknown partial instruction: {instruction}.")
      }
    }
  }
}

impl Error for UnsupportedHotApi {}
