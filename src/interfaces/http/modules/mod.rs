//! HTTP API modules, one per resource group

pub mod alerts;
pub mod auth;
pub mod grid;
pub mod health;
pub mod readings;
