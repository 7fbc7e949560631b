pub use sea_orm_migration::prelude::*;

mod m20250701_000001_create_users;
mod m20250701_000002_create_requisitions;
mod m20250701_000003_create_catalog_records;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250701_000001_create_users::Migration),
            Box::new(m20250701_000002_create_requisitions::Migration),
            Box::new(m20250701_000003_create_catalog_records::Migration),
        ]
    }
}
