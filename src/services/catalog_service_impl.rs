//! `SeaORM` implementation of the [`CatalogService`] trait.

use crate::config::ListingConfig;
use crate::db::Store;
use crate::domain::{
    Genre, GenreCount, GenreId, PagedResult, Title, TitleFilter, TitleId, TitleSort, TitleUpsert,
};
use crate::services::catalog_service::{CatalogError, CatalogService};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

pub struct SeaOrmCatalogService {
    store: Arc<Store>,
    listing: ListingConfig,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Arc<Store>, listing: ListingConfig) -> Self {
        Self { store, listing }
    }

    /// Page size and number as the database sees them: at least 1, and the
    /// size capped at the configured maximum.
    fn effective_paging(&self, page_size: u32, page_number: u32) -> (u32, u32) {
        let max = self.listing.max_page_size.max(1);
        (page_size.clamp(1, max), page_number.max(1))
    }

    async fn ensure_genres_exist(&self, genre_ids: &[GenreId]) -> Result<(), CatalogError> {
        let existing = self.store.count_existing_genres(genre_ids).await?;
        if existing != genre_ids.len() as u64 {
            return Err(CatalogError::InvalidData(format!(
                "unknown genre in {:?}",
                genre_ids.iter().map(GenreId::value).collect::<Vec<_>>()
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn get_genres_with_title_counts(&self) -> Result<Vec<GenreCount>, CatalogError> {
        Ok(self.store.list_genres_with_title_counts().await?)
    }

    async fn get_titles(
        &self,
        page_size: u32,
        page_number: u32,
        filter: &TitleFilter,
        sort: TitleSort,
        sort_descending: bool,
    ) -> Result<PagedResult<Title>, CatalogError> {
        let (page_size, page_number) = self.effective_paging(page_size, page_number);

        let (titles, total) = self
            .store
            .list_titles(
                u64::from(page_size),
                u64::from(page_number),
                filter,
                sort,
                sort_descending,
            )
            .await?;

        debug!(
            page_size,
            page_number,
            total,
            returned = titles.len(),
            "Fetched title page"
        );

        Ok(PagedResult::new(titles, total, page_size, page_number))
    }

    async fn get_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        Ok(self.store.list_genres().await?)
    }

    async fn get_title_by_id(&self, id: TitleId) -> Result<Title, CatalogError> {
        self.store
            .get_title(id.value())
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn insert_or_update_title(&self, mut title: TitleUpsert) -> Result<Title, CatalogError> {
        let mut seen = HashSet::new();
        title.genre_ids.retain(|id| seen.insert(*id));
        self.ensure_genres_exist(&title.genre_ids).await?;

        match title.id {
            None => Ok(self.store.insert_title(&title).await?),
            Some(id) => self
                .store
                .update_title(id.value(), &title)
                .await?
                .ok_or(CatalogError::NotFound(id)),
        }
    }
}
