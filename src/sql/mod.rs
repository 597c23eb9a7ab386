//! Safe SQL builder: identifiers from model config only, values as parameters.

mod builder;
pub use builder::*;
