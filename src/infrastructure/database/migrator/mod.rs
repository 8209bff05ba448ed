//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_token_blacklist;
mod m20250101_000003_create_coverage_areas;
mod m20250101_000004_create_transformers;
mod m20250101_000005_create_meters;
mod m20250101_000006_create_readings;
mod m20250101_000007_create_alerts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_token_blacklist::Migration),
            Box::new(m20250101_000003_create_coverage_areas::Migration),
            Box::new(m20250101_000004_create_transformers::Migration),
            Box::new(m20250101_000005_create_meters::Migration),
            Box::new(m20250101_000006_create_readings::Migration),
            Box::new(m20250101_000007_create_alerts::Migration),
        ]
    }
}
