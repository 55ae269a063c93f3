//! Database migrations.

mod m20250101_000001_create_guest_table;

use sea_orm_migration::prelude::*;

/// Migration runner.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250101_000001_create_guest_table::Migration)]
    }
}
