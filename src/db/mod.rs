use crate::domain::{Genre, GenreCount, GenreId, Title, TitleFilter, TitleSort, TitleUpsert};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn title_repo(&self) -> repositories::title::TitleRepository {
        repositories::title::TitleRepository::new(self.conn.clone())
    }

    fn genre_repo(&self) -> repositories::genre::GenreRepository {
        repositories::genre::GenreRepository::new(self.conn.clone())
    }

    pub async fn get_title(&self, id: i32) -> Result<Option<Title>> {
        self.title_repo().get(id).await
    }

    pub async fn list_titles(
        &self,
        page_size: u64,
        page_number: u64,
        filter: &TitleFilter,
        sort: TitleSort,
        sort_descending: bool,
    ) -> Result<(Vec<Title>, u64)> {
        self.title_repo()
            .list_page(page_size, page_number, filter, sort, sort_descending)
            .await
    }

    pub async fn insert_title(&self, title: &TitleUpsert) -> Result<Title> {
        self.title_repo().insert(title).await
    }

    pub async fn update_title(&self, id: i32, title: &TitleUpsert) -> Result<Option<Title>> {
        self.title_repo().update(id, title).await
    }

    pub async fn list_genres(&self) -> Result<Vec<Genre>> {
        self.genre_repo().list().await
    }

    pub async fn list_genres_with_title_counts(&self) -> Result<Vec<GenreCount>> {
        self.genre_repo().list_with_title_counts().await
    }

    pub async fn count_existing_genres(&self, ids: &[GenreId]) -> Result<u64> {
        self.genre_repo().count_existing(ids).await
    }
}
