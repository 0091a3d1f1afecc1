use crate::domain::{GenreId, Title, TitleFilter, TitleId, TitleSort, TitleType, TitleUpsert};
use crate::entities::{prelude::*, title_genres, titles};
use anyhow::Result;
use sea_orm::sea_query::{LikeExpr, Order, Query};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use std::collections::HashMap;
use tracing::{info, warn};

const LIKE_ESCAPE: char = '\\';

pub struct TitleRepository {
    conn: DatabaseConnection,
}

impl TitleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model_to_title(model: titles::Model, genre_ids: Vec<GenreId>) -> Title {
        let title_type = model.title_type.parse().unwrap_or_else(|_| {
            warn!(
                "Title {} has unknown title type '{}', falling back to {}",
                model.id,
                model.title_type,
                TitleType::default()
            );
            TitleType::default()
        });

        Title {
            id: TitleId::new(model.id),
            primary_title: model.primary_title,
            original_title: model.original_title,
            title_type,
            start_year: model.start_year,
            end_year: model.end_year,
            runtime_minutes: model.runtime_minutes,
            genre_ids,
        }
    }

    pub async fn get(&self, id: i32) -> Result<Option<Title>> {
        Self::get_with(&self.conn, id).await
    }

    async fn get_with<C: ConnectionTrait>(conn: &C, id: i32) -> Result<Option<Title>> {
        let Some(model) = Titles::find_by_id(id).one(conn).await? else {
            return Ok(None);
        };

        let genre_ids = TitleGenres::find()
            .filter(title_genres::Column::TitleId.eq(id))
            .order_by_asc(title_genres::Column::GenreId)
            .all(conn)
            .await?
            .into_iter()
            .map(|row| GenreId::new(row.genre_id))
            .collect();

        Ok(Some(Self::map_model_to_title(model, genre_ids)))
    }

    /// One page of titles matching `filter`, plus the total match count.
    ///
    /// Rows with equal sort keys are ordered by id in the same direction, so
    /// consecutive pages never overlap.
    pub async fn list_page(
        &self,
        page_size: u64,
        page_number: u64,
        filter: &TitleFilter,
        sort: TitleSort,
        sort_descending: bool,
    ) -> Result<(Vec<Title>, u64)> {
        let order = if sort_descending {
            Order::Desc
        } else {
            Order::Asc
        };

        let query = Self::apply_filter(Titles::find(), filter)
            .order_by(Self::sort_column(sort), order.clone())
            .order_by(titles::Column::Id, order);

        let paginator = query.paginate(&self.conn, page_size);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page_number.saturating_sub(1)).await?;

        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut genres_by_title = self.genre_ids_for_titles(&ids).await?;

        let titles = models
            .into_iter()
            .map(|model| {
                let genre_ids = genres_by_title.remove(&model.id).unwrap_or_default();
                Self::map_model_to_title(model, genre_ids)
            })
            .collect();

        Ok((titles, total))
    }

    const fn sort_column(sort: TitleSort) -> titles::Column {
        match sort {
            TitleSort::PrimaryTitle => titles::Column::PrimaryTitle,
            TitleSort::OriginalTitle => titles::Column::OriginalTitle,
            TitleSort::ReleaseYear => titles::Column::StartYear,
            TitleSort::RuntimeMinutes => titles::Column::RuntimeMinutes,
        }
    }

    fn apply_filter(mut query: Select<Titles>, filter: &TitleFilter) -> Select<Titles> {
        if let Some(text) = &filter.text {
            let pattern = format!("%{}%", escape_like(text));
            query = query.filter(
                Condition::any()
                    .add(
                        titles::Column::PrimaryTitle
                            .like(LikeExpr::new(pattern.as_str()).escape(LIKE_ESCAPE)),
                    )
                    .add(
                        titles::Column::OriginalTitle
                            .like(LikeExpr::new(pattern.as_str()).escape(LIKE_ESCAPE)),
                    ),
            );
        }

        for genre_id in &filter.genre_ids {
            query = query.filter(
                titles::Column::Id.in_subquery(
                    Query::select()
                        .column(title_genres::Column::TitleId)
                        .from(TitleGenres)
                        .and_where(title_genres::Column::GenreId.eq(genre_id.value()))
                        .to_owned(),
                ),
            );
        }

        if !filter.title_types.is_empty() {
            query = query.filter(
                titles::Column::TitleType.is_in(filter.title_types.iter().map(TitleType::as_str)),
            );
        }

        if let Some(from) = filter.start_year_from {
            query = query.filter(titles::Column::StartYear.gte(from));
        }

        if let Some(to) = filter.start_year_to {
            query = query.filter(titles::Column::StartYear.lte(to));
        }

        query
    }

    async fn genre_ids_for_titles(&self, title_ids: &[i32]) -> Result<HashMap<i32, Vec<GenreId>>> {
        if title_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = TitleGenres::find()
            .filter(title_genres::Column::TitleId.is_in(title_ids.to_vec()))
            .order_by_asc(title_genres::Column::GenreId)
            .all(&self.conn)
            .await?;

        let mut map: HashMap<i32, Vec<GenreId>> = HashMap::new();
        for row in rows {
            map.entry(row.title_id)
                .or_default()
                .push(GenreId::new(row.genre_id));
        }

        Ok(map)
    }

    /// Inserts a new title with its genre set and returns the stored title.
    pub async fn insert(&self, title: &TitleUpsert) -> Result<Title> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.conn.begin().await?;

        let active_model = titles::ActiveModel {
            primary_title: Set(title.primary_title.clone()),
            original_title: Set(title.original_title.clone()),
            title_type: Set(title.title_type.as_str().to_string()),
            start_year: Set(title.start_year),
            end_year: Set(title.end_year),
            runtime_minutes: Set(title.runtime_minutes),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let id = Titles::insert(active_model).exec(&txn).await?.last_insert_id;
        Self::replace_genres(&txn, id, &title.genre_ids).await?;

        let stored = Self::get_with(&txn, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve inserted title {id}"))?;

        txn.commit().await?;

        info!("Added title {}: {}", id, stored.primary_title);
        Ok(stored)
    }

    /// Updates an existing title and replaces its genre set.
    ///
    /// Returns `None` without writing anything when no title has this id.
    pub async fn update(&self, id: i32, title: &TitleUpsert) -> Result<Option<Title>> {
        let txn = self.conn.begin().await?;

        if Titles::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(None);
        }

        Titles::update(titles::ActiveModel {
            id: Set(id),
            primary_title: Set(title.primary_title.clone()),
            original_title: Set(title.original_title.clone()),
            title_type: Set(title.title_type.as_str().to_string()),
            start_year: Set(title.start_year),
            end_year: Set(title.end_year),
            runtime_minutes: Set(title.runtime_minutes),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        })
        .exec(&txn)
        .await?;

        Self::replace_genres(&txn, id, &title.genre_ids).await?;

        let stored = Self::get_with(&txn, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve updated title {id}"))?;

        txn.commit().await?;

        info!("Updated title {}: {}", id, stored.primary_title);
        Ok(Some(stored))
    }

    async fn replace_genres<C: ConnectionTrait>(
        conn: &C,
        title_id: i32,
        genre_ids: &[GenreId],
    ) -> Result<()> {
        TitleGenres::delete_many()
            .filter(title_genres::Column::TitleId.eq(title_id))
            .exec(conn)
            .await?;

        if genre_ids.is_empty() {
            return Ok(());
        }

        let rows: Vec<title_genres::ActiveModel> = genre_ids
            .iter()
            .map(|genre_id| title_genres::ActiveModel {
                title_id: Set(title_id),
                genre_id: Set(genre_id.value()),
            })
            .collect();

        TitleGenres::insert_many(rows)
            .exec_without_returning(conn)
            .await?;
        Ok(())
    }
}

/// Makes `text` match literally inside a `LIKE` pattern escaped with [`LIKE_ESCAPE`].
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
