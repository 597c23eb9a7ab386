pub mod common;
pub mod descriptor;
pub mod factory;
pub mod mount;

pub use common::{common_routes, common_routes_with_ready};
pub use descriptor::{Handler, HandlerFuture, RouteDescriptor, RouteRequest};
pub use factory::build_routes;
pub use mount::{model_routes, mount};
