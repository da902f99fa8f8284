//! HTTP-level tests for the media catalog routes.

mod common;

use common::TestHarness;
use serde_json::{json, Value};

async fn post_json(addr: std::net::SocketAddr, path: &str, body: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{addr}{path}"))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn list(addr: std::net::SocketAddr, query: &str) -> Vec<Value> {
    let resp = reqwest::get(format!("http://{addr}/api/media?{query}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn add_media_returns_created_item() {
    let (h, addr) = TestHarness::with_server().await;
    let resp = post_json(
        addr,
        "/api/media",
        json!({
            "title": "  Arrival  ",
            "release_year": 2016,
            "kind": "Movie",
            "genre": "science fiction",
            "rating": 8.5
        }),
    )
    .await;
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "Arrival");
    assert_eq!(body["kind"], "movie");
    assert_eq!(body["genre"], "ScienceFiction");
    assert_eq!(body["rating"], 8.5);
    assert_eq!(body["watched"], false);
    assert_eq!(body["created_at"], body["updated_at"]);

    let conn = h.db.get().unwrap();
    assert_eq!(mc_db::queries::media_items::count_media(&conn).unwrap(), 1);
}

#[tokio::test]
async fn add_media_rejects_bad_fields() {
    let (_h, addr) = TestHarness::with_server().await;

    let blank = post_json(
        addr,
        "/api/media",
        json!({"title": "   ", "release_year": 2000, "kind": "movie"}),
    )
    .await;
    assert_eq!(blank.status(), 400);
    let body: Value = blank.json().await.unwrap();
    assert_eq!(body["code"], "invalid_argument");

    let early = post_json(
        addr,
        "/api/media",
        json!({"title": "Too Early", "release_year": 1800, "kind": "movie"}),
    )
    .await;
    assert_eq!(early.status(), 400);

    let kind = post_json(
        addr,
        "/api/media",
        json!({"title": "Podcast", "release_year": 2020, "kind": "podcast"}),
    )
    .await;
    assert_eq!(kind.status(), 400);

    let rating = post_json(
        addr,
        "/api/media",
        json!({"title": "Overrated", "release_year": 2020, "kind": "movie", "rating": 11}),
    )
    .await;
    assert_eq!(rating.status(), 400);
}

#[tokio::test]
async fn get_media_by_id_and_unknown_id() {
    let (h, addr) = TestHarness::with_server().await;
    let item = h.add_movie("Heat", 1995).await;

    let resp = reqwest::get(format!("http://{addr}/api/media/{}", item.id()))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "Heat");

    let missing = reqwest::get(format!(
        "http://{addr}/api/media/{}",
        mc_core::MediaId::new()
    ))
    .await
    .unwrap();
    assert_eq!(missing.status(), 404);
    let body: Value = missing.json().await.unwrap();
    assert_eq!(body["code"], "not_found");

    let garbage = reqwest::get(format!("http://{addr}/api/media/nope"))
        .await
        .unwrap();
    assert_eq!(garbage.status(), 400);
}

#[tokio::test]
async fn list_filters_sorts_and_pages() {
    let (_h, addr) = TestHarness::with_server().await;
    for (title, year, kind, rating) in [
        ("The Matrix", 1999, "movie", 9.0),
        ("Matrix Reloaded", 2003, "movie", 7.0),
        ("Dark", 2017, "series", 8.5),
        ("The Wire", 2002, "series", 9.5),
    ] {
        let resp = post_json(
            addr,
            "/api/media",
            json!({"title": title, "release_year": year, "kind": kind, "rating": rating}),
        )
        .await;
        assert_eq!(resp.status(), 201);
    }

    let found = list(addr, "search=MATRIX&sort_by=releaseYear").await;
    let titles: Vec<&str> = found.iter().map(|v| v["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["The Matrix", "Matrix Reloaded"]);

    let series = list(addr, "kind=series&sort_by=rating&ascending=false").await;
    let titles: Vec<&str> = series.iter().map(|v| v["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["The Wire", "Dark"]);

    let ranged = list(addr, "year_from=2000&year_to=2010&sort_by=title").await;
    let titles: Vec<&str> = ranged.iter().map(|v| v["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Matrix Reloaded", "The Wire"]);

    let second_page = list(addr, "sort_by=title&page=2&page_size=3").await;
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0]["title"], "The Wire");

    let past_end = list(addr, "page=9").await;
    assert!(past_end.is_empty());

    let coerced = list(addr, "page=-4&page_size=0").await;
    assert_eq!(coerced.len(), 4);
}

#[tokio::test]
async fn list_rejects_unknown_kind() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/api/media?kind=podcast"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn rate_by_id_and_by_title() {
    let (h, addr) = TestHarness::with_server().await;
    let heat = h.add_movie("Heat", 1995).await;
    h.add_movie("Ronin", 1998).await;

    let by_id = post_json(
        addr,
        &format!("/api/media/{}/rate", heat.id()),
        json!({"rating": 9.0}),
    )
    .await;
    assert_eq!(by_id.status(), 200);
    let body: Value = by_id.json().await.unwrap();
    assert_eq!(body["rating"], 9.0);

    let by_title = post_json(
        addr,
        "/api/media/rate",
        json!({"title": "Ronin", "rating": 7.5}),
    )
    .await;
    assert_eq!(by_title.status(), 200);
    let body: Value = by_title.json().await.unwrap();
    assert_eq!(body["title"], "Ronin");
    assert_eq!(body["rating"], 7.5);

    let out_of_range = post_json(
        addr,
        &format!("/api/media/{}/rate", heat.id()),
        json!({"rating": -1}),
    )
    .await;
    assert_eq!(out_of_range.status(), 400);
}

#[tokio::test]
async fn rate_by_reference_errors() {
    let (h, addr) = TestHarness::with_server().await;
    h.add_movie("Solaris", 1972).await;
    h.add_movie("Solaris", 2002).await;

    let ambiguous = post_json(
        addr,
        "/api/media/rate",
        json!({"title": "Solaris", "rating": 8}),
    )
    .await;
    assert_eq!(ambiguous.status(), 409);
    let body: Value = ambiguous.json().await.unwrap();
    assert_eq!(body["code"], "ambiguous_reference");

    let missing = post_json(
        addr,
        "/api/media/rate",
        json!({"title": "solaris", "rating": 8}),
    )
    .await;
    assert_eq!(missing.status(), 404);

    let unspecified = post_json(addr, "/api/media/rate", json!({"rating": 8})).await;
    assert_eq!(unspecified.status(), 400);
}

#[tokio::test]
async fn mark_watched_and_update() {
    let (h, addr) = TestHarness::with_server().await;
    let item = h.add_movie("Alien", 1979).await;

    let watched = post_json(addr, &format!("/api/media/{}/watched", item.id()), json!({})).await;
    assert_eq!(watched.status(), 200);
    let body: Value = watched.json().await.unwrap();
    assert_eq!(body["watched"], true);

    let resp = reqwest::Client::new()
        .put(format!("http://{addr}/api/media/{}", item.id()))
        .json(&json!({
            "title": "Aliens",
            "release_year": 1986,
            "kind": "movie",
            "genre": "action"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "Aliens");
    assert_eq!(body["release_year"], 1986);
    assert_eq!(body["genre"], "Action");
    assert_eq!(body["watched"], true);
    assert_eq!(body["id"], item.id().to_string());

    let unwatched = list(addr, "watched=false").await;
    assert!(unwatched.is_empty());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (_h, addr) = TestHarness::with_server().await;
    let resp = reqwest::get(format!("http://{addr}/api-docs/openapi.json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let doc: Value = resp.json().await.unwrap();
    assert!(doc["paths"]["/api/media"].is_object());
    assert!(doc["paths"]["/api/media/rate"].is_object());
}

#[tokio::test]
async fn malformed_input_gets_the_json_error_body() {
    let (_h, addr) = TestHarness::with_server().await;

    let no_year = reqwest::Client::new()
        .post(format!("http://{addr}/api/media"))
        .header("x-request-id", "add-no-year")
        .json(&json!({"title": "No Year", "kind": "movie"}))
        .send()
        .await
        .unwrap();
    assert_eq!(no_year.status(), 400);
    let body: Value = no_year.json().await.unwrap();
    assert_eq!(body["code"], "invalid_argument");
    assert_eq!(body["request_id"], "add-no-year");

    let bad_page = reqwest::get(format!("http://{addr}/api/media?page=abc"))
        .await
        .unwrap();
    assert_eq!(bad_page.status(), 400);
    assert!(bad_page.headers().contains_key("x-request-id"));
    let body: Value = bad_page.json().await.unwrap();
    assert_eq!(body["code"], "invalid_argument");
    assert!(body["request_id"].is_string());

    let not_json = reqwest::Client::new()
        .post(format!("http://{addr}/api/media/rate"))
        .body("rating=5")
        .send()
        .await
        .unwrap();
    assert_eq!(not_json.status(), 400);
}
