//! Docroutes: generated CRUD routes over a document store, driven by model configuration.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod query;
pub mod response;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;
pub mod validation;

pub use config::{load_models_from_path, load_models_from_str, resolve, ModelConfig, ModelDescriptor, ResolvedModels, Settings};
pub use error::{AppError, ConfigError, StoreError};
pub use query::{build_filter, build_projection, Filter, Projection};
pub use response::RouteResponse;
pub use routes::{build_routes, common_routes, common_routes_with_ready, model_routes, mount, RouteDescriptor, RouteRequest};
pub use state::AppState;
pub use store::{ensure_database_exists, DocumentStore, MemoryStore, PgDocumentStore};
