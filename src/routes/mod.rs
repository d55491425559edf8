pub mod api;
mod entry;
pub mod route_list;

pub use entry::{API_PREFIX, build_app, router};
