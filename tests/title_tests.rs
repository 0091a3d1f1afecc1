//! Integration tests for the title create/edit page.

mod common;

use axum::http::StatusCode;
use common::{FakeCatalog, app_with, body_json, get, location, post_form, session_cookie};
use movie_catalog::domain::{GenreId, TitleId, TitleType};
use std::sync::Arc;

const VALID_FORM: &str =
    "primaryTitle=Alien&originalTitle=Alien&titleType=Movie&startYear=1979&runtimeMinutes=117\
     &genres=1&genres=4";

#[tokio::test]
async fn test_blank_form_without_id() {
    let catalog = Arc::new(FakeCatalog::new());
    let app = app_with(catalog.clone());

    let response = get(&app, "/title", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let data = &body["data"];

    assert!(data["id"].is_null());
    assert!(data["success_message"].is_null());
    assert!(data["form"]["primary_title"].is_null());
    assert_eq!(data["form"]["title_type"], "Movie");
    assert_eq!(data["genre_options"].as_array().unwrap().len(), 4);
    assert!(
        data["genre_options"]
            .as_array()
            .unwrap()
            .iter()
            .all(|o| o["selected"] == false)
    );
    assert!(data["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_existing_title_populates_form() {
    let catalog = Arc::new(FakeCatalog::with_titles(2));
    let app = app_with(catalog.clone());

    let response = get(&app, "/title?id=2", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let data = &body["data"];

    assert_eq!(data["id"], 2);
    assert_eq!(data["form"]["primary_title"], "Title 2");
    assert_eq!(data["form"]["original_title"], "Original 2");
    assert_eq!(data["form"]["genres"], serde_json::json!([1]));
    assert_eq!(data["genre_options"][0]["selected"], true);
    assert_eq!(data["genre_options"][1]["selected"], false);
}

#[tokio::test]
async fn test_unknown_id_redirects_to_blank_form() {
    let catalog = Arc::new(FakeCatalog::with_titles(2));
    let app = app_with(catalog.clone());

    let response = get(&app, "/title?id=999", None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/title");
}

#[tokio::test]
async fn test_insert_redirects_to_new_title_with_message() {
    let catalog = Arc::new(FakeCatalog::with_titles(7));
    let app = app_with(catalog.clone());

    let response = post_form(&app, "/title", VALID_FORM).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/title?id=8");

    let upserts = catalog.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0].id, None);
    assert_eq!(upserts[0].primary_title, "Alien");
    assert_eq!(upserts[0].runtime_minutes, Some(117));
    assert_eq!(upserts[0].genre_ids, vec![GenreId::new(1), GenreId::new(4)]);

    let cookie = session_cookie(&response).expect("session cookie");
    let response = get(&app, "/title?id=8", Some(&cookie)).await;
    let body = body_json(response).await;

    assert_eq!(body["data"]["success_message"], "Movie added successfully.");
    assert_eq!(body["data"]["form"]["primary_title"], "Alien");
}

#[tokio::test]
async fn test_update_redirects_to_same_title_with_message() {
    let catalog = Arc::new(FakeCatalog::with_titles(3));
    let app = app_with(catalog.clone());

    let response = post_form(&app, "/title?id=2", VALID_FORM).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/title?id=2");

    let upserts = catalog.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0].id, Some(TitleId::new(2)));

    let cookie = session_cookie(&response).expect("session cookie");
    let body = body_json(get(&app, "/title?id=2", Some(&cookie)).await).await;
    assert_eq!(
        body["data"]["success_message"],
        "Movie updated successfully."
    );
}

#[tokio::test]
async fn test_id_is_accepted_as_form_field() {
    let catalog = Arc::new(FakeCatalog::with_titles(3));
    let app = app_with(catalog.clone());

    let response = post_form(&app, "/title", &format!("id=3&{VALID_FORM}")).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/title?id=3");
    assert_eq!(catalog.upserts()[0].id, Some(TitleId::new(3)));
}

#[tokio::test]
async fn test_success_message_is_shown_once() {
    let catalog = Arc::new(FakeCatalog::new());
    let app = app_with(catalog.clone());

    let response = post_form(&app, "/title", VALID_FORM).await;
    let target = location(&response).to_string();
    let cookie = session_cookie(&response).expect("session cookie");

    let first = body_json(get(&app, &target, Some(&cookie)).await).await;
    assert_eq!(first["data"]["success_message"], "Movie added successfully.");

    let second = body_json(get(&app, &target, Some(&cookie)).await).await;
    assert!(second["data"]["success_message"].is_null());
}

#[tokio::test]
async fn test_invalid_submit_redisplays_entered_values() {
    let catalog = Arc::new(FakeCatalog::with_titles(1));
    let app = app_with(catalog.clone());

    let response = post_form(
        &app,
        "/title?id=1",
        "primaryTitle=&originalTitle=Solaris&titleType=TvSeries&startYear=1972&endYear=1899\
         &genres=3",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(catalog.upserts().is_empty());

    let body = body_json(response).await;
    let data = &body["data"];

    assert_eq!(data["id"], 1);
    assert!(data["success_message"].is_null());
    assert_eq!(data["form"]["original_title"], "Solaris");
    assert_eq!(data["form"]["title_type"], "TvSeries");
    assert_eq!(data["form"]["start_year"], 1972);
    assert_eq!(data["form"]["end_year"], 1899);
    assert_eq!(data["genre_options"][2]["selected"], true);

    let errors = data["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0]["field"], "primaryTitle");
    assert_eq!(errors[0]["message"], "The Primary title field is required.");
    assert_eq!(errors[1]["field"], "endYear");
    assert_eq!(
        errors[1]["message"],
        "The field Year of last season must be between 1900 and 2100."
    );
}

#[tokio::test]
async fn test_unparseable_number_is_a_field_error() {
    let catalog = Arc::new(FakeCatalog::new());
    let app = app_with(catalog.clone());

    let response = post_form(
        &app,
        "/title",
        "primaryTitle=Alien&originalTitle=Alien&runtimeMinutes=long",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(catalog.upserts().is_empty());

    let body = body_json(response).await;
    assert_eq!(body["data"]["form"]["primary_title"], "Alien");
    assert_eq!(
        body["data"]["errors"][0]["message"],
        "The value 'long' is not valid for General runtime in minutes."
    );
}

#[tokio::test]
async fn test_rejected_values_are_echoed_back() {
    let catalog = Arc::new(FakeCatalog::new());
    let app = app_with(catalog.clone());

    let response = post_form(
        &app,
        "/title",
        "primaryTitle=Alien&originalTitle=Alien&titleType=TvSeriez&startYear=nineteen",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(catalog.upserts().is_empty());

    let body = body_json(response).await;
    let data = &body["data"];

    assert_eq!(data["form"]["attempted"]["titleType"], "TvSeriez");
    assert_eq!(data["form"]["attempted"]["startYear"], "nineteen");
    assert!(data["form"]["start_year"].is_null());
    assert!(
        data["title_type_options"]
            .as_array()
            .unwrap()
            .iter()
            .all(|o| o["selected"] == false)
    );

    let fields: Vec<_> = data["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["titleType", "startYear"]);
}

#[tokio::test]
async fn test_genre_limit_on_submit() {
    let catalog = Arc::new(FakeCatalog::new());
    let app = app_with(catalog.clone());

    let response = post_form(
        &app,
        "/title",
        "primaryTitle=Alien&originalTitle=Alien&genres=1&genres=2&genres=3&genres=4",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(catalog.upserts().is_empty());
    let body = body_json(response).await;
    assert_eq!(
        body["data"]["errors"][0]["message"],
        "Maximum 3 genres allowed."
    );

    let response = post_form(
        &app,
        "/title",
        "primaryTitle=Alien&originalTitle=Alien&genres=1&genres=2&genres=3&genres=2",
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let upserts = catalog.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(
        upserts[0].genre_ids,
        vec![GenreId::new(1), GenreId::new(2), GenreId::new(3)]
    );
    assert_eq!(upserts[0].title_type, TitleType::Movie);
}

#[tokio::test]
async fn test_data_service_failures_surface_as_errors() {
    let catalog = Arc::new(FakeCatalog::with_titles(1));
    let app = app_with(catalog.clone());

    let response = post_form(&app, "/title?id=42", VALID_FORM).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);

    let response = post_form(
        &app,
        "/title",
        "primaryTitle=Alien&originalTitle=Alien&genres=99",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app_with(Arc::new(FakeCatalog::new()));

    let response = get(&app, "/health/live", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "alive");

    let response = get(&app, "/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["ready"], true);
}
