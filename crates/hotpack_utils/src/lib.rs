pub mod indexmap;
pub mod url;
