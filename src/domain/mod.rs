//! Domain types for the movie catalog with strong typing.
//!
//! Identifiers are newtypes so title and genre ids cannot be mixed up, and the
//! enumerations carry their own canonical string forms used in query strings,
//! form fields and the database.

pub mod filter;
pub mod listing;

pub use filter::TitleFilter;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a Title, assigned by storage.
///
/// # Examples
///
/// ```rust
/// use movie_catalog::domain::TitleId;
///
/// let id = TitleId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleId(i32);

impl TitleId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for TitleId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl From<TitleId> for i32 {
    fn from(id: TitleId) -> Self {
        id.0
    }
}

/// Unique identifier for a Genre. Genres are owned by the data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenreId(i32);

impl GenreId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for GenreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for GenreId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

/// Error returned when an enumeration value cannot be parsed from its string form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Kind of a catalog title.
///
/// The first variant is the default used by a blank edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TitleType {
    #[default]
    Movie,
    Short,
    TvMovie,
    TvSeries,
    TvMiniSeries,
    TvEpisode,
    TvSpecial,
    Video,
    VideoGame,
}

impl TitleType {
    pub const ALL: [Self; 9] = [
        Self::Movie,
        Self::Short,
        Self::TvMovie,
        Self::TvSeries,
        Self::TvMiniSeries,
        Self::TvEpisode,
        Self::TvSpecial,
        Self::Video,
        Self::VideoGame,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Short => "Short",
            Self::TvMovie => "TvMovie",
            Self::TvSeries => "TvSeries",
            Self::TvMiniSeries => "TvMiniSeries",
            Self::TvEpisode => "TvEpisode",
            Self::TvSpecial => "TvSpecial",
            Self::Video => "Video",
            Self::VideoGame => "VideoGame",
        }
    }
}

impl fmt::Display for TitleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TitleType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEnumError::new("title type", s))
    }
}

/// Sort key for the title listing.
///
/// Declaration order is the order the sort options are offered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TitleSort {
    PrimaryTitle,
    OriginalTitle,
    ReleaseYear,
    RuntimeMinutes,
}

impl TitleSort {
    pub const ALL: [Self; 4] = [
        Self::PrimaryTitle,
        Self::OriginalTitle,
        Self::ReleaseYear,
        Self::RuntimeMinutes,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PrimaryTitle => "PrimaryTitle",
            Self::OriginalTitle => "OriginalTitle",
            Self::ReleaseYear => "ReleaseYear",
            Self::RuntimeMinutes => "RuntimeMinutes",
        }
    }
}

impl fmt::Display for TitleSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TitleSort {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseEnumError::new("title sort", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// A genre together with the number of titles tagged with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: Genre,
    pub title_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub id: TitleId,
    pub primary_title: String,
    pub original_title: String,
    pub title_type: TitleType,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    /// Associated genres in the order the data service returns them.
    pub genre_ids: Vec<GenreId>,
}

/// Values written by an insert-or-update. `id: None` inserts a new title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleUpsert {
    pub id: Option<TitleId>,
    pub primary_title: String,
    pub original_title: String,
    pub title_type: TitleType,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    /// Replaces any previous genre associations entirely.
    pub genre_ids: Vec<GenreId>,
}

/// One page of results plus the total count across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagedResult<T> {
    pub results: Vec<T>,
    pub total_count: u64,
    pub page_size: u32,
    pub page_number: u32,
}

impl<T> PagedResult<T> {
    #[must_use]
    pub const fn new(results: Vec<T>, total_count: u64, page_size: u32, page_number: u32) -> Self {
        Self {
            results,
            total_count,
            page_size,
            page_number,
        }
    }

    #[must_use]
    pub const fn empty(page_size: u32) -> Self {
        Self::new(Vec::new(), 0, page_size, 1)
    }

    /// `ceil(total_count / page_size)`, never less than 1.
    #[must_use]
    pub fn last_page_number(&self) -> u32 {
        let page_size = u64::from(self.page_size.max(1));
        let pages = self.total_count.div_ceil(page_size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            results: self.results.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_size: self.page_size,
            page_number: self.page_number,
        }
    }
}
