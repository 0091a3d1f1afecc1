pub mod prelude;

pub mod genres;
pub mod title_genres;
pub mod titles;
