mod common;

use axum::http::Method;
use serde_json::json;

use common::{header_value, ids, response_json, TestApp};

#[tokio::test]
async fn banner_lifecycle() {
    let app = TestApp::new().await;

    let created = app
        .create(
            "/api/banners",
            json!({ "bannerLink": "/api/public-images/hero.png", "bannerStatus": "ENABLED" }),
        )
        .await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["createdTime"], created["modifiedTime"]);

    let response = app
        .request(
            Method::PUT,
            &format!("/api/banners/{id}"),
            Some(json!({ "id": id, "bannerLink": "/api/public-images/hero-2.png" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let updated = response_json(response).await;
    assert_eq!(updated["bannerLink"], "/api/public-images/hero-2.png");
    assert!(updated["bannerStatus"].is_null());
    assert_eq!(updated["createdTime"], created["createdTime"]);

    let response = app
        .request(
            Method::PATCH,
            &format!("/api/banners/{id}"),
            Some(json!({ "id": id, "bannerStatus": "DISABLED", "modifiedBy": "admin" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let patched = response_json(response).await;
    assert_eq!(patched["bannerLink"], "/api/public-images/hero-2.png");
    assert_eq!(patched["bannerStatus"], "DISABLED");
    assert_eq!(patched["modifiedBy"], "admin");

    let response = app
        .request(Method::DELETE, &format!("/api/banners/{id}"), None)
        .await;
    assert_eq!(response.status(), 204);
    assert_eq!(
        header_value(&response, "x-chemistry-alert"),
        Some("chemistryApp.banner.deleted")
    );
    assert_eq!(app.get(&format!("/api/banners/{id}")).await.status(), 404);

    // Deleting again is still a success.
    let response = app
        .request(Method::DELETE, &format!("/api/banners/{id}"), None)
        .await;
    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn blank_links_are_rejected() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::POST, "/api/banners", Some(json!({ "bannerLink": "  " })))
        .await;
    assert_eq!(response.status(), 400);

    let response = app
        .request(Method::POST, "/api/banners", Some(json!({ "bannerStatus": "ENABLED" })))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn string_contains_is_case_sensitive() {
    let app = TestApp::new().await;
    let upper = app
        .create("/api/banners", json!({ "bannerLink": "/img/Hero.png" }))
        .await["id"]
        .as_i64()
        .unwrap();
    let lower = app
        .create("/api/banners", json!({ "bannerLink": "/img/hero.png" }))
        .await["id"]
        .as_i64()
        .unwrap();

    let body = app.get_json("/api/banners?bannerLink.contains=Hero").await;
    assert_eq!(ids(&body), vec![upper]);

    let body = app
        .get_json("/api/banners?bannerLink.doesNotContain=Hero")
        .await;
    assert_eq!(ids(&body), vec![lower]);
}

#[tokio::test]
async fn paging_walks_every_banner_once() {
    let app = TestApp::new().await;
    let mut created = Vec::new();
    for n in 0..5 {
        let body = app
            .create("/api/banners", json!({ "bannerLink": format!("/img/{n}.png") }))
            .await;
        created.push(body["id"].as_i64().unwrap());
    }

    let mut seen = Vec::new();
    for page in 0..3 {
        let response = app
            .get(&format!("/api/banners?page={page}&size=2&sort=bannerLink,desc"))
            .await;
        assert_eq!(response.status(), 200);
        assert_eq!(header_value(&response, "x-total-count"), Some("5"));
        seen.extend(ids(&response_json(response).await));
    }
    created.reverse();
    assert_eq!(seen, created);

    let count = app.get_json("/api/banners/count").await;
    assert_eq!(count, json!(5));
    let count = app
        .get_json(&format!("/api/banners/count?id.in={},{}", created[0], created[1]))
        .await;
    assert_eq!(count, json!(2));
}
