//! Request validation from model rules.

mod input;
mod payload;
pub use input::{InputValidation, ParamRule, ParamsSchema, QuerySchema};
pub use payload::{FieldRule, PayloadSchema};
