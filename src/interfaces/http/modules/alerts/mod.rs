//! Operational alerts module

pub mod dto;
pub mod handlers;

pub use handlers::AlertHandlerState;
