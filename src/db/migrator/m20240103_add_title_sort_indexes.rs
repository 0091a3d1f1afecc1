use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_titles_start_year")
                    .table(Titles::Table)
                    .col(Titles::StartYear)
                    .col(Titles::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_titles_primary_title")
                    .table(Titles::Table)
                    .col(Titles::PrimaryTitle)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_title_genres_genre_id")
                    .table(TitleGenres::Table)
                    .col(TitleGenres::GenreId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_title_genres_genre_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_titles_primary_title").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_titles_start_year").to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Titles {
    Table,
    Id,
    StartYear,
    PrimaryTitle,
}

#[derive(DeriveIden)]
enum TitleGenres {
    Table,
    GenreId,
}
