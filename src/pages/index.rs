//! Title listing page.
//!
//! Paging and sorting come exclusively from the query string. A request that
//! lacks any of them is redirected to the canonical default listing, so every
//! rendered page has a shareable, fully-specified URL.

use axum::{
    Json,
    extract::{RawQuery, State},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::form::{as_str_pairs, decode_pairs};
use super::{ApiResponse, AppState, GenreCountDto, IndexPage, PageError, PageLink, TitleDto};
use crate::domain::listing::{ListingQuery, ListingRequest, page_number_window};

/// `GET /`
pub async fn index(
    State(state): State<Arc<AppState>>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, PageError> {
    let pairs = decode_pairs(raw_query.as_deref().unwrap_or_default());

    let query = ListingQuery::from_query_pairs(as_str_pairs(&pairs));
    let Some(request) = query.into_request() else {
        let target = format!("/?{}", ListingRequest::default().to_query_string());
        debug!(query = ?raw_query, %target, "Incomplete listing query, redirecting");
        return Ok(Redirect::to(&target).into_response());
    };

    let catalog = state.catalog();
    let (genre_counts, titles) = futures::try_join!(
        catalog.get_genres_with_title_counts(),
        catalog.get_titles(
            request.page_size,
            request.page_number,
            &request.filter,
            request.title_sort,
            request.sort_descending,
        ),
    )?;

    let last_page_number = titles.last_page_number();
    let page_number_options = page_number_window(request.page_number, last_page_number);

    let page_links = page_number_options
        .iter()
        .map(|&number| PageLink {
            number,
            href: format!("/?{}", request.with_page_number(number).to_query_string()),
            current: number == request.page_number,
        })
        .collect();

    let total_count = titles.total_count;
    let page = IndexPage {
        genres_with_counts: genre_counts.into_iter().map(GenreCountDto::from).collect(),
        titles: titles.map(TitleDto::from).results,
        total_count,
        last_page_number,
        page_size_options: request.page_size_options(),
        title_sort_options: request.title_sort_options(),
        sort_direction_options: request.sort_direction_options(),
        page_number_options,
        page_links,
        request,
    };

    Ok(Json(ApiResponse::success(page)).into_response())
}
