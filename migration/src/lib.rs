pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_movies;
mod m20240601_000002_create_bot_users;
mod m20240615_000001_add_movie_uploaded_at;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_movies::Migration),
            Box::new(m20240601_000002_create_bot_users::Migration),
            Box::new(m20240615_000001_add_movie_uploaded_at::Migration),
        ]
    }
}
