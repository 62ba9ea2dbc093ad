pub use sea_orm_migration::prelude::*;

mod m20250501_120000_create_crowdfund_tables;
// Add other migration modules here if you have more

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250501_120000_create_crowdfund_tables::Migration)]
    }
}
