use sea_orm_migration::prelude::*;

mod m20240101_initial;
mod m20240102_seed_genres;
mod m20240103_add_title_sort_indexes;

pub use m20240102_seed_genres::DEFAULT_GENRES;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_initial::Migration),
            Box::new(m20240102_seed_genres::Migration),
            Box::new(m20240103_add_title_sort_indexes::Migration),
        ]
    }
}
