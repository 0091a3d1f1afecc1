use crate::entities::genres;
use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Genre catalog shipped with a fresh database.
pub const DEFAULT_GENRES: [&str; 27] = [
    "Action",
    "Adult",
    "Adventure",
    "Animation",
    "Biography",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "Film-Noir",
    "Game-Show",
    "History",
    "Horror",
    "Music",
    "Musical",
    "Mystery",
    "News",
    "Reality-TV",
    "Romance",
    "Sci-Fi",
    "Sport",
    "Talk-Show",
    "Thriller",
    "War",
    "Western",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert()
            .into_table(Genres)
            .columns([genres::Column::Name])
            .to_owned();

        for name in DEFAULT_GENRES {
            insert.values_panic([name.into()]);
        }

        insert.on_conflict(
            OnConflict::column(genres::Column::Name)
                .do_nothing()
                .to_owned(),
        );

        manager.exec_stmt(insert).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Genres)
            .and_where(Expr::col(genres::Column::Name).is_in(DEFAULT_GENRES))
            .to_owned();

        manager.exec_stmt(delete).await?;
        Ok(())
    }
}
