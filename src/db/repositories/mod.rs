pub mod genre;
pub mod title;
