//! Per-request query objects derived from URL query strings.

mod filter;
pub mod pagination;
mod projection;

pub use filter::{build_filter, Filter};
pub use pagination::{fields_param, Pagination};
pub use projection::{build_projection, Projection, EXCLUDE, INCLUDE};
