//! Data service contract consumed by the catalog pages.
//!
//! The pages never touch the database directly; everything they read or write
//! goes through [`CatalogService`], which keeps them testable against an
//! in-memory implementation.

use crate::domain::{
    Genre, GenreCount, PagedResult, Title, TitleFilter, TitleId, TitleSort, TitleUpsert,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Title not found: {0}")]
    NotFound(TitleId),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid title data: {0}")]
    InvalidData(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Every genre with the number of titles tagged with it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Database`] on connection failures.
    async fn get_genres_with_title_counts(&self) -> Result<Vec<GenreCount>, CatalogError>;

    /// One page of titles matching `filter`, ordered by `sort`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Database`] on connection failures.
    async fn get_titles(
        &self,
        page_size: u32,
        page_number: u32,
        filter: &TitleFilter,
        sort: TitleSort,
        sort_descending: bool,
    ) -> Result<PagedResult<Title>, CatalogError>;

    /// The full genre catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Database`] on connection failures.
    async fn get_genres(&self) -> Result<Vec<Genre>, CatalogError>;

    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] if no title has this id
    /// - Returns [`CatalogError::Database`] on connection failures
    async fn get_title_by_id(&self, id: TitleId) -> Result<Title, CatalogError>;

    /// Inserts (`id: None`) or updates a title and replaces its genre set.
    /// The returned title carries the authoritative id.
    ///
    /// # Errors
    ///
    /// - Returns [`CatalogError::NotFound`] when updating an id that does not exist
    /// - Returns [`CatalogError::InvalidData`] when a genre id is unknown
    /// - Returns [`CatalogError::Database`] on connection failures
    async fn insert_or_update_title(&self, title: TitleUpsert) -> Result<Title, CatalogError>;
}
