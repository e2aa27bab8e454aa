pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_tenancy_tables;
mod m20250301_000002_create_school_records;
mod m20250301_000003_create_academic_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_tenancy_tables::Migration),
            Box::new(m20250301_000002_create_school_records::Migration),
            Box::new(m20250301_000003_create_academic_tables::Migration),
        ]
    }
}
