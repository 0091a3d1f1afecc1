use serde::Serialize;

use super::{GenreId, TitleType};

const TEXT_KEY: &str = "filter.text";
const GENRE_IDS_KEY: &str = "filter.genreIds";
const TITLE_TYPES_KEY: &str = "filter.titleTypes";
const START_YEAR_FROM_KEY: &str = "filter.startYearFrom";
const START_YEAR_TO_KEY: &str = "filter.startYearTo";

/// Listing predicate. The listing page only carries it between the query
/// string and the data service; the data service is the one that applies it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TitleFilter {
    /// Case-insensitive substring of the primary or original title.
    pub text: Option<String>,
    /// Titles must carry every listed genre.
    pub genre_ids: Vec<GenreId>,
    /// Titles must be one of these types; empty means any.
    pub title_types: Vec<TitleType>,
    pub start_year_from: Option<i32>,
    pub start_year_to: Option<i32>,
}

impl TitleFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Binds the `filter.*` keys of a decoded query string. Keys match
    /// case-insensitively; values that do not parse are ignored. The text is
    /// kept exactly as submitted unless it is blank.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::default();

        for (key, raw) in pairs {
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }

            if key.eq_ignore_ascii_case(TEXT_KEY) {
                filter.text = Some(raw.to_string());
            } else if key.eq_ignore_ascii_case(GENRE_IDS_KEY) {
                if let Ok(id) = value.parse::<i32>() {
                    let id = GenreId::new(id);
                    if !filter.genre_ids.contains(&id) {
                        filter.genre_ids.push(id);
                    }
                }
            } else if key.eq_ignore_ascii_case(TITLE_TYPES_KEY) {
                if let Ok(title_type) = value.parse::<TitleType>()
                    && !filter.title_types.contains(&title_type)
                {
                    filter.title_types.push(title_type);
                }
            } else if key.eq_ignore_ascii_case(START_YEAR_FROM_KEY) {
                filter.start_year_from = value.parse().ok();
            } else if key.eq_ignore_ascii_case(START_YEAR_TO_KEY) {
                filter.start_year_to = value.parse().ok();
            }
        }

        filter
    }

    /// The query pairs that bind back to this filter.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(text) = &self.text {
            pairs.push((TEXT_KEY, text.clone()));
        }
        for id in &self.genre_ids {
            pairs.push((GENRE_IDS_KEY, id.to_string()));
        }
        for title_type in &self.title_types {
            pairs.push((TITLE_TYPES_KEY, title_type.to_string()));
        }
        if let Some(year) = self.start_year_from {
            pairs.push((START_YEAR_FROM_KEY, year.to_string()));
        }
        if let Some(year) = self.start_year_to {
            pairs.push((START_YEAR_TO_KEY, year.to_string()));
        }

        pairs
    }
}
