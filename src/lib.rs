//! # Enerlytics
//!
//! Electricity distribution analysis API: coverage areas, transformers,
//! meters and the time-series readings they produce, behind JWT
//! authentication.
//!
//! ## Architecture
//!
//! - **query**: generic filter parsing, predicate compilation and
//!   pagination shared by every list endpoint
//! - **infrastructure**: database (entities, migrations) and crypto
//!   (JWT, password hashing)
//! - **interfaces**: REST API with Swagger documentation
//! - **config**: TOML + environment configuration

pub mod config;
pub mod infrastructure;
pub mod interfaces;
pub mod query;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
