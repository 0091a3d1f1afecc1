pub use super::genres::Entity as Genres;
pub use super::title_genres::Entity as TitleGenres;
pub use super::titles::Entity as Titles;
