//! Time-series readings module

pub mod dto;
pub mod handlers;

pub use handlers::ReadingHandlerState;
