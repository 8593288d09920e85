pub use sea_orm_migration::prelude::*;

mod m20231101_000000_items;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20231101_000000_items::Migration)]
    }
}
