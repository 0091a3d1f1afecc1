use crate::domain::{Genre, GenreCount, GenreId};
use crate::entities::{genres, prelude::*, title_genres};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};

pub struct GenreRepository {
    conn: DatabaseConnection,
}

impl GenreRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<Genre>> {
        let rows = Genres::find()
            .order_by_asc(genres::Column::Name)
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Genre {
                id: GenreId::new(row.id),
                name: row.name,
            })
            .collect())
    }

    /// Every genre with the number of titles tagged with it, zero included.
    pub async fn list_with_title_counts(&self) -> Result<Vec<GenreCount>> {
        let rows: Vec<(i32, String, i64)> = Genres::find()
            .select_only()
            .column(genres::Column::Id)
            .column(genres::Column::Name)
            .column_as(title_genres::Column::TitleId.count(), "title_count")
            .join(JoinType::LeftJoin, genres::Relation::TitleGenres.def())
            .group_by(genres::Column::Id)
            .group_by(genres::Column::Name)
            .order_by_asc(genres::Column::Name)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, count)| GenreCount {
                genre: Genre {
                    id: GenreId::new(id),
                    name,
                },
                title_count: u64::try_from(count).unwrap_or_default(),
            })
            .collect())
    }

    /// How many of `ids` name an existing genre.
    pub async fn count_existing(&self, ids: &[GenreId]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let count = Genres::find()
            .filter(genres::Column::Id.is_in(ids.iter().map(GenreId::value)))
            .count(&self.conn)
            .await?;

        Ok(count)
    }
}
