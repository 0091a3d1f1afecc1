//! Create/edit page for a single title.
//!
//! `GET /title` renders a blank form, `GET /title?id=N` a populated one. A
//! submit that passes validation is upserted and redirected back to the
//! page of the stored title, carrying a one-shot confirmation message.

use axum::{
    Json,
    extract::{RawQuery, State},
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::{debug, info};

use super::form::{FieldError, TitleField, TitleForm, as_str_pairs, bind_id, decode_pairs};
use super::validation::validate_title_form;
use super::{ApiResponse, AppState, PageError, TitlePage, flash};
use crate::domain::listing::SelectOption;
use crate::domain::{Genre, GenreId, Title, TitleId, TitleType};
use crate::services::{CatalogError, CatalogService};

pub const ADDED_MESSAGE: &str = "Movie added successfully.";
pub const UPDATED_MESSAGE: &str = "Movie updated successfully.";

const BLANK_PAGE_PATH: &str = "/title";

enum TitleLookup {
    Found(Title),
    NotFound,
}

async fn lookup_title(
    catalog: &dyn CatalogService,
    id: TitleId,
) -> Result<TitleLookup, CatalogError> {
    match catalog.get_title_by_id(id).await {
        Ok(title) => Ok(TitleLookup::Found(title)),
        Err(CatalogError::NotFound(_)) => Ok(TitleLookup::NotFound),
        Err(e) => Err(e),
    }
}

/// `GET /title[?id=N]`
pub async fn show(
    State(state): State<Arc<AppState>>,
    session: Session,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, PageError> {
    let pairs = decode_pairs(raw_query.as_deref().unwrap_or_default());
    let id = bind_id(as_str_pairs(&pairs));

    let form = match id {
        None => TitleForm::default(),
        Some(id) => match lookup_title(state.catalog().as_ref(), id).await? {
            TitleLookup::Found(title) => TitleForm::from_title(&title),
            TitleLookup::NotFound => {
                debug!(title_id = %id, "Title not found, showing blank form");
                return Ok(Redirect::to(BLANK_PAGE_PATH).into_response());
            }
        },
    };

    let success_message = flash::take_success(&session).await?;
    let page = render(&state, id, success_message, form, Vec::new()).await?;

    Ok(Json(ApiResponse::success(page)).into_response())
}

/// `POST /title[?id=N]`
pub async fn submit(
    State(state): State<Arc<AppState>>,
    session: Session,
    RawQuery(raw_query): RawQuery,
    body: String,
) -> Result<Response, PageError> {
    let fields = decode_pairs(&body);
    let query = decode_pairs(raw_query.as_deref().unwrap_or_default());
    let id = bind_id(as_str_pairs(&fields)).or_else(|| bind_id(as_str_pairs(&query)));

    let (form, mut errors) = TitleForm::bind(as_str_pairs(&fields));

    let upsert = match validate_title_form(id, &form) {
        Ok(upsert) if errors.is_empty() => upsert,
        validated => {
            if let Err(validation_errors) = validated {
                errors.extend(validation_errors);
            }
            debug!(
                title_id = ?id.map(|id| id.value()),
                error_count = errors.len(),
                "Title form rejected"
            );
            let page = render(&state, id, None, form, errors).await?;
            return Ok(Json(ApiResponse::success(page)).into_response());
        }
    };

    let saved = state.catalog().insert_or_update_title(upsert).await?;

    let message = if id.is_none() {
        info!(title_id = %saved.id, title = %saved.primary_title, "Title added");
        ADDED_MESSAGE
    } else {
        info!(title_id = %saved.id, title = %saved.primary_title, "Title updated");
        UPDATED_MESSAGE
    };
    flash::set_success(&session, message).await?;

    Ok(Redirect::to(&format!("{}?id={}", BLANK_PAGE_PATH, saved.id)).into_response())
}

async fn render(
    state: &AppState,
    id: Option<TitleId>,
    success_message: Option<String>,
    form: TitleForm,
    errors: Vec<FieldError>,
) -> Result<TitlePage, PageError> {
    let genres = state.catalog().get_genres().await?;
    let selected_type =
        (!form.was_rejected(TitleField::TitleType)).then_some(form.title_type);

    Ok(TitlePage {
        id,
        success_message,
        genre_options: genre_options(&genres, &form.genres),
        title_type_options: title_type_options(selected_type),
        form,
        errors,
    })
}

/// The full genre catalog with the bound genres marked as selected.
fn genre_options(genres: &[Genre], selected: &[GenreId]) -> Vec<SelectOption> {
    genres
        .iter()
        .map(|genre| {
            SelectOption::new(
                genre.name.clone(),
                genre.id.to_string(),
                selected.contains(&genre.id),
            )
        })
        .collect()
}

/// Every title type; `None` leaves all of them unselected.
fn title_type_options(selected: Option<TitleType>) -> Vec<SelectOption> {
    TitleType::ALL
        .iter()
        .map(|&t| SelectOption::new(t.as_str(), t.as_str(), Some(t) == selected))
        .collect()
}
