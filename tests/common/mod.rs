#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use movie_catalog::config::Config;
use movie_catalog::domain::{
    Genre, GenreCount, GenreId, PagedResult, Title, TitleFilter, TitleId, TitleSort, TitleType,
    TitleUpsert,
};
use movie_catalog::pages::{self, AppState};
use movie_catalog::services::{CatalogError, CatalogService};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// A data-service call as the fake saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetGenresWithTitleCounts,
    GetTitles {
        page_size: u32,
        page_number: u32,
        filter: TitleFilter,
        sort: TitleSort,
        sort_descending: bool,
    },
    GetGenres,
    GetTitleById(TitleId),
    InsertOrUpdateTitle(TitleUpsert),
}

struct FakeState {
    genres: Vec<Genre>,
    titles: BTreeMap<i32, Title>,
    next_id: i32,
    calls: Vec<Call>,
}

/// In-memory catalog that records every call made against it.
pub struct FakeCatalog {
    state: Mutex<FakeState>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        let genres = ["Action", "Comedy", "Drama", "Sci-Fi"]
            .iter()
            .zip(1..)
            .map(|(name, id)| Genre {
                id: GenreId::new(id),
                name: (*name).to_string(),
            })
            .collect();

        Self {
            state: Mutex::new(FakeState {
                genres,
                titles: BTreeMap::new(),
                next_id: 1,
                calls: Vec::new(),
            }),
        }
    }

    /// A catalog holding `count` generated titles with ids `1..=count`.
    pub fn with_titles(count: i32) -> Self {
        let catalog = Self::new();
        {
            let mut state = catalog.state.lock().unwrap();
            for id in 1..=count {
                state.titles.insert(id, sample_title(id));
            }
            state.next_id = count + 1;
        }
        catalog
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn upserts(&self) -> Vec<TitleUpsert> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::InsertOrUpdateTitle(upsert) => Some(upsert),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

pub fn sample_title(id: i32) -> Title {
    Title {
        id: TitleId::new(id),
        primary_title: format!("Title {id}"),
        original_title: format!("Original {id}"),
        title_type: TitleType::Movie,
        start_year: Some(1950 + id % 70),
        end_year: None,
        runtime_minutes: Some(90),
        genre_ids: vec![GenreId::new(1)],
    }
}

#[async_trait::async_trait]
impl CatalogService for FakeCatalog {
    async fn get_genres_with_title_counts(&self) -> Result<Vec<GenreCount>, CatalogError> {
        self.record(Call::GetGenresWithTitleCounts);
        let state = self.state.lock().unwrap();
        Ok(state
            .genres
            .iter()
            .map(|genre| GenreCount {
                genre: genre.clone(),
                title_count: state
                    .titles
                    .values()
                    .filter(|t| t.genre_ids.contains(&genre.id))
                    .count() as u64,
            })
            .collect())
    }

    async fn get_titles(
        &self,
        page_size: u32,
        page_number: u32,
        filter: &TitleFilter,
        sort: TitleSort,
        sort_descending: bool,
    ) -> Result<PagedResult<Title>, CatalogError> {
        self.record(Call::GetTitles {
            page_size,
            page_number,
            filter: filter.clone(),
            sort,
            sort_descending,
        });

        let state = self.state.lock().unwrap();
        let skip = (page_size as usize).saturating_mul(page_number.saturating_sub(1) as usize);
        let results = state
            .titles
            .values()
            .skip(skip)
            .take(page_size as usize)
            .cloned()
            .collect();

        Ok(PagedResult::new(
            results,
            state.titles.len() as u64,
            page_size,
            page_number,
        ))
    }

    async fn get_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        self.record(Call::GetGenres);
        Ok(self.state.lock().unwrap().genres.clone())
    }

    async fn get_title_by_id(&self, id: TitleId) -> Result<Title, CatalogError> {
        self.record(Call::GetTitleById(id));
        self.state
            .lock()
            .unwrap()
            .titles
            .get(&id.value())
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn insert_or_update_title(&self, title: TitleUpsert) -> Result<Title, CatalogError> {
        self.record(Call::InsertOrUpdateTitle(title.clone()));
        let mut state = self.state.lock().unwrap();

        if let Some(unknown) = title
            .genre_ids
            .iter()
            .find(|id| !state.genres.iter().any(|g| g.id == **id))
        {
            return Err(CatalogError::InvalidData(format!("unknown genre {unknown}")));
        }

        let id = match title.id {
            Some(id) if state.titles.contains_key(&id.value()) => id,
            Some(id) => return Err(CatalogError::NotFound(id)),
            None => {
                let id = TitleId::new(state.next_id);
                state.next_id += 1;
                id
            }
        };

        let stored = Title {
            id,
            primary_title: title.primary_title,
            original_title: title.original_title,
            title_type: title.title_type,
            start_year: title.start_year,
            end_year: title.end_year,
            runtime_minutes: title.runtime_minutes,
            genre_ids: title.genre_ids,
        };
        state.titles.insert(id.value(), stored.clone());
        Ok(stored)
    }
}

pub fn app_with(catalog: Arc<FakeCatalog>) -> Router {
    let state = AppState::new(Config::default(), catalog, None, None);
    pages::router(Arc::new(state))
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }

    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_form(app: &Router, uri: &str, body: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect without location")
        .to_str()
        .unwrap()
}

/// The `name=value` part of the session cookie set by a response.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
