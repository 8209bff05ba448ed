//! HTTP interface: router, middleware and resource modules

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
