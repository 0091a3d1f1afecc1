//! Binding of query strings and urlencoded form bodies.
//!
//! Keys are matched case-insensitively. Values that fail to convert are
//! reported as field errors instead of rejecting the whole request, so the
//! form can be redisplayed with everything else the user typed.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{GenreId, Title, TitleId, TitleType};

/// Decodes an `application/x-www-form-urlencoded` string into owned pairs.
#[must_use]
pub fn decode_pairs(encoded: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(encoded.as_bytes())
        .into_owned()
        .collect()
}

/// Borrowing view over decoded pairs, in the shape the binders take.
pub fn as_str_pairs(pairs: &[(String, String)]) -> impl Iterator<Item = (&str, &str)> + Clone {
    pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

/// The title id carried by a request. Blank or non-numeric values bind to no id.
pub fn bind_id<'a, I>(pairs: I) -> Option<TitleId>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("id"))
        .and_then(|(_, value)| value.trim().parse::<i32>().ok())
        .map(TitleId::new)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TitleField {
    PrimaryTitle,
    OriginalTitle,
    TitleType,
    StartYear,
    EndYear,
    RuntimeMinutes,
    Genres,
}

impl TitleField {
    /// Form key the field binds from.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::PrimaryTitle => "primaryTitle",
            Self::OriginalTitle => "originalTitle",
            Self::TitleType => "titleType",
            Self::StartYear => "startYear",
            Self::EndYear => "endYear",
            Self::RuntimeMinutes => "runtimeMinutes",
            Self::Genres => "genres",
        }
    }

    /// Human-readable name used in messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PrimaryTitle => "Primary title",
            Self::OriginalTitle => "Original title",
            Self::TitleType => "Title type",
            Self::StartYear => "Start/release year",
            Self::EndYear => "Year of last season",
            Self::RuntimeMinutes => "General runtime in minutes",
            Self::Genres => "Genres",
        }
    }

    const ALL: [Self; 7] = [
        Self::PrimaryTitle,
        Self::OriginalTitle,
        Self::TitleType,
        Self::StartYear,
        Self::EndYear,
        Self::RuntimeMinutes,
        Self::Genres,
    ];

    fn from_key(key: &str) -> Option<Self> {
        let key = key.strip_suffix("[]").unwrap_or(key);
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: TitleField,
    pub message: String,
}

impl FieldError {
    pub fn new(field: TitleField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn invalid_value(field: TitleField, raw: &str) -> Self {
        Self::new(
            field,
            format!("The value '{}' is not valid for {}.", raw, field.label()),
        )
    }
}

/// Bound edit-form values. A blank form is `TitleForm::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TitleForm {
    pub primary_title: Option<String>,
    pub original_title: Option<String>,
    pub title_type: TitleType,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    /// Selected genres, duplicates collapsed, first occurrence first.
    pub genres: Vec<GenreId>,
    /// Raw submitted text of fields that failed to convert, echoed back on
    /// redisplay. For `genres` only the first rejected value is kept.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attempted: BTreeMap<TitleField, String>,
}

impl TitleForm {
    #[must_use]
    pub fn from_title(title: &Title) -> Self {
        Self {
            primary_title: Some(title.primary_title.clone()),
            original_title: Some(title.original_title.clone()),
            title_type: title.title_type,
            start_year: title.start_year,
            end_year: title.end_year,
            runtime_minutes: title.runtime_minutes,
            genres: title.genre_ids.clone(),
            attempted: BTreeMap::new(),
        }
    }

    /// Binds a submitted form. Empty values bind to "not set"; scalar fields
    /// take their first occurrence and `genres` collects every occurrence.
    pub fn bind<'a, I>(pairs: I) -> (Self, Vec<FieldError>)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut form = Self::default();
        let mut errors = Vec::new();
        let mut seen = Vec::new();

        for (key, raw) in pairs {
            let Some(field) = TitleField::from_key(key) else {
                continue;
            };

            if field != TitleField::Genres {
                if seen.contains(&field) {
                    continue;
                }
                seen.push(field);
            }

            if raw.trim().is_empty() {
                continue;
            }

            match field {
                TitleField::PrimaryTitle => form.primary_title = Some(raw.to_string()),
                TitleField::OriginalTitle => form.original_title = Some(raw.to_string()),
                TitleField::TitleType => match raw.trim().parse() {
                    Ok(title_type) => form.title_type = title_type,
                    Err(_) => form.reject(field, raw, &mut errors),
                },
                TitleField::StartYear => form.start_year = form.bind_int(field, raw, &mut errors),
                TitleField::EndYear => form.end_year = form.bind_int(field, raw, &mut errors),
                TitleField::RuntimeMinutes => {
                    form.runtime_minutes = form.bind_int(field, raw, &mut errors);
                }
                TitleField::Genres => {
                    if let Some(id) = form.bind_int(field, raw, &mut errors) {
                        let id = GenreId::new(id);
                        if !form.genres.contains(&id) {
                            form.genres.push(id);
                        }
                    }
                }
            }
        }

        (form, errors)
    }

    /// Whether `field` holds a submitted value that failed to convert.
    #[must_use]
    pub fn was_rejected(&self, field: TitleField) -> bool {
        self.attempted.contains_key(&field)
    }

    fn bind_int(
        &mut self,
        field: TitleField,
        raw: &str,
        errors: &mut Vec<FieldError>,
    ) -> Option<i32> {
        let parsed = raw.trim().parse().ok();
        if parsed.is_none() {
            self.reject(field, raw, errors);
        }
        parsed
    }

    fn reject(&mut self, field: TitleField, raw: &str, errors: &mut Vec<FieldError>) {
        errors.push(FieldError::invalid_value(field, raw));
        self.attempted.entry(field).or_insert_with(|| raw.to_string());
    }
}
