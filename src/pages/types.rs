use serde::Serialize;

use super::form::{FieldError, TitleForm};
use crate::domain::listing::{ListingRequest, SelectOption};
use crate::domain::{GenreCount, GenreId, Title, TitleId};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TitleDto {
    pub id: TitleId,
    pub primary_title: String,
    pub original_title: String,
    pub title_type: String,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub genre_ids: Vec<GenreId>,
    pub edit_href: String,
}

impl From<Title> for TitleDto {
    fn from(title: Title) -> Self {
        Self {
            edit_href: format!("/title?id={}", title.id),
            id: title.id,
            primary_title: title.primary_title,
            original_title: title.original_title,
            title_type: title.title_type.to_string(),
            start_year: title.start_year,
            end_year: title.end_year,
            runtime_minutes: title.runtime_minutes,
            genre_ids: title.genre_ids,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenreCountDto {
    pub id: GenreId,
    pub name: String,
    pub title_count: u64,
}

impl From<GenreCount> for GenreCountDto {
    fn from(count: GenreCount) -> Self {
        Self {
            id: count.genre.id,
            name: count.genre.name,
            title_count: count.title_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

/// Everything the listing template needs for one render.
#[derive(Debug, Serialize)]
pub struct IndexPage {
    pub request: ListingRequest,
    pub genres_with_counts: Vec<GenreCountDto>,
    pub titles: Vec<TitleDto>,
    pub total_count: u64,
    pub last_page_number: u32,
    pub page_size_options: Vec<SelectOption>,
    pub title_sort_options: Vec<SelectOption>,
    pub sort_direction_options: Vec<SelectOption>,
    pub page_number_options: Vec<u32>,
    pub page_links: Vec<PageLink>,
}

/// Everything the create/edit template needs for one render.
#[derive(Debug, Serialize)]
pub struct TitlePage {
    pub id: Option<TitleId>,
    pub success_message: Option<String>,
    pub form: TitleForm,
    pub genre_options: Vec<SelectOption>,
    pub title_type_options: Vec<SelectOption>,
    pub errors: Vec<FieldError>,
}
