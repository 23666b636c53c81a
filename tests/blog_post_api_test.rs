mod common;

use axum::http::{header, Method};
use serde_json::{json, Value};

use common::{header_value, ids, response_json, TestApp};

fn post(title: &str) -> Value {
    json!({
        "blogPostTitleVi": title,
        "blogPostContentVi": "<p>Nội dung</p>",
        "blogPostContentEn": "<p>Body</p>",
        "blogPostStatus": "ENABLED",
    })
}

#[tokio::test]
async fn blog_post_lifecycle() {
    let app = TestApp::new().await;
    let category = app.create_category("Tin tức", None).await;

    let mut body = post("Hóa học xanh");
    body["category"] = json!({ "id": category });
    let response = app
        .request(Method::POST, "/api/blog-posts", Some(body))
        .await;
    assert_eq!(response.status(), 201);
    assert_eq!(
        header_value(&response, "x-chemistry-alert"),
        Some("chemistryApp.blogPost.created")
    );
    let created = response_json(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["category"]["id"], category);
    assert!(created["createdTime"].is_string());
    assert_eq!(created["createdTime"], created["modifiedTime"]);

    let fetched = app.get_json(&format!("/api/blog-posts/{id}")).await;
    assert_eq!(fetched["blogPostContentVi"], "<p>Nội dung</p>");
    assert_eq!(fetched["blogPostTitleVi"], "Hóa học xanh");

    // Partial update touches only the provided fields.
    let response = app
        .request(
            Method::PATCH,
            &format!("/api/blog-posts/{id}"),
            Some(json!({ "id": id, "blogPostAuthor": "Bộ môn Hóa" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    let patched = response_json(response).await;
    assert_eq!(patched["blogPostAuthor"], "Bộ môn Hóa");
    assert_eq!(patched["blogPostTitleVi"], "Hóa học xanh");
    assert_eq!(patched["blogPostContentVi"], "<p>Nội dung</p>");
    assert_eq!(patched["category"]["id"], category);

    // Full update writes omitted fields as null but keeps creation audit.
    let response = app
        .request(
            Method::PUT,
            &format!("/api/blog-posts/{id}"),
            Some(json!({ "id": id, "blogPostTitleVi": "Hóa học bền vững" })),
        )
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        header_value(&response, "x-chemistry-alert"),
        Some("chemistryApp.blogPost.updated")
    );
    let updated = response_json(response).await;
    assert_eq!(updated["blogPostTitleVi"], "Hóa học bền vững");
    assert!(updated["blogPostContentVi"].is_null());
    assert!(updated["category"].is_null());
    assert_eq!(updated["createdTime"], created["createdTime"]);

    let response = app
        .request(Method::DELETE, &format!("/api/blog-posts/{id}"), None)
        .await;
    assert_eq!(response.status(), 204);
    assert_eq!(header_value(&response, "x-chemistry-params"), Some(id.to_string().as_str()));

    let response = app.get(&format!("/api/blog-posts/{id}")).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn id_rules_are_enforced() {
    let app = TestApp::new().await;

    let mut with_id = post("Có id");
    with_id["id"] = json!(7);
    let response = app
        .request(Method::POST, "/api/blog-posts", Some(with_id))
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(header_value(&response, "x-chemistry-error"), Some("error.idexists"));
    assert_eq!(header_value(&response, "x-chemistry-params"), Some("blogPost"));
    let body = response_json(response).await;
    assert_eq!(body["errorKey"], "idexists");

    let id = app.create_post(post("Bài viết")).await;

    let response = app
        .request(Method::PUT, &format!("/api/blog-posts/{id}"), Some(post("x")))
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(header_value(&response, "x-chemistry-error"), Some("error.idnull"));

    let mut mismatched = post("x");
    mismatched["id"] = json!(id + 1);
    let response = app
        .request(Method::PATCH, &format!("/api/blog-posts/{id}"), Some(mismatched))
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(header_value(&response, "x-chemistry-error"), Some("error.idinvalid"));

    let missing = id + 100;
    let mut body = post("x");
    body["id"] = json!(missing);
    let response = app
        .request(Method::PUT, &format!("/api/blog-posts/{missing}"), Some(body.clone()))
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(header_value(&response, "x-chemistry-error"), Some("error.idnotfound"));

    let response = app
        .request(Method::PATCH, &format!("/api/blog-posts/{missing}"), Some(body))
        .await;
    assert_eq!(response.status(), 404);

    let mut orphan = post("Không có danh mục");
    orphan["category"] = json!({ "id": 999 });
    let response = app
        .request(Method::POST, "/api/blog-posts", Some(orphan))
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(
        header_value(&response, "x-chemistry-error"),
        Some("error.categorynotfound")
    );
}

#[tokio::test]
async fn view_counter_starts_at_one_and_increments() {
    let app = TestApp::new().await;
    let id = app.create_post(post("Lượt xem")).await;

    let before = app.get_json(&format!("/api/blog-posts/{id}")).await;
    assert!(before["numberOfViews"].is_null());

    for expected in [1, 2] {
        let response = app
            .request(Method::PUT, &format!("/api/blog-posts/{id}/views"), None)
            .await;
        assert_eq!(response.status(), 200);
        let body = response_json(response).await;
        assert_eq!(body["numberOfViews"], expected);
    }

    let response = app
        .request(Method::PUT, "/api/blog-posts/4242/views", None)
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(header_value(&response, "x-chemistry-error"), Some("error.idnotfound"));
}

#[tokio::test]
async fn pages_omit_content_but_single_fetch_keeps_it() {
    let app = TestApp::new().await;
    for n in 0..3 {
        app.create_post(post(&format!("Bài {n}"))).await;
    }

    let response = app.get("/api/blog-posts?page=0&size=2&sort=id,asc").await;
    assert_eq!(response.status(), 200);
    assert_eq!(header_value(&response, "x-total-count"), Some("3"));
    let link = header_value(&response, header::LINK.as_str()).unwrap().to_string();
    assert!(link.contains("page=1&size=2>; rel=\"next\""), "{link}");
    assert!(link.contains("page=1&size=2>; rel=\"last\""), "{link}");
    assert!(!link.contains("rel=\"prev\""), "{link}");

    let page = response_json(response).await;
    let items = page.as_array().unwrap();
    assert_eq!(items.len(), 2);
    for item in items {
        assert!(item["blogPostContentVi"].is_null());
        assert!(item["blogPostContentEn"].is_null());
        assert!(item["blogPostTitleVi"].is_string());
    }

    let id = items[0]["id"].as_i64().unwrap();
    let single = app.get_json(&format!("/api/blog-posts/{id}")).await;
    assert_eq!(single["blogPostContentVi"], "<p>Nội dung</p>");
    assert_eq!(single["blogPostContentEn"], "<p>Body</p>");
}

#[tokio::test]
async fn list_sorts_filters_and_counts() {
    let app = TestApp::new().await;
    let chemistry = app.create_category("Hóa học", None).await;

    let mut first = post("Hóa Học 101");
    first["category"] = json!({ "id": chemistry });
    first["numberOfViews"] = json!(5);
    let first = app.create_post(first).await;
    let mut second = post("Vật lý");
    second["blogPostStatus"] = json!("DRAFT");
    let second = app.create_post(second).await;
    let mut third = post("hoa hoc nang cao");
    third["numberOfViews"] = json!(12);
    let third = app.create_post(third).await;

    let body = app
        .get_json("/api/blog-posts?blogPostTitleVi.contains=hoa%20hoc&sort=id,desc")
        .await;
    assert_eq!(ids(&body), vec![third, first]);

    let body = app
        .get_json(&format!("/api/blog-posts?categoryId.equals={chemistry}"))
        .await;
    assert_eq!(ids(&body), vec![first]);

    let body = app
        .get_json("/api/blog-posts?categoryId.specified=false&sort=id,asc")
        .await;
    assert_eq!(ids(&body), vec![second, third]);

    let body = app
        .get_json("/api/blog-posts?numberOfViews.greaterThanOrEqual=5&sort=numberOfViews,desc")
        .await;
    assert_eq!(ids(&body), vec![third, first]);

    let count = app
        .get_json("/api/blog-posts/count?blogPostStatus.in=ENABLED,DRAFT")
        .await;
    assert_eq!(count, json!(3));
    let count = app
        .get_json("/api/blog-posts/count?blogPostStatus.notEquals=DRAFT")
        .await;
    assert_eq!(count, json!(2));

    let missing = chemistry + 1000;
    let response = app
        .get(&format!("/api/blog-posts?categoryId.equals={missing}"))
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(header_value(&response, "x-total-count"), Some("0"));
    assert_eq!(response_json(response).await, json!([]));
    let count = app
        .get_json(&format!("/api/blog-posts/count?categoryId.in={missing}"))
        .await;
    assert_eq!(count, json!(0));
}

#[tokio::test]
async fn bad_filters_are_rejected() {
    let app = TestApp::new().await;

    let response = app.get("/api/blog-posts?numberOfViews.equals=many").await;
    assert_eq!(response.status(), 400);

    let response = app.get("/api/blog-posts?sort=password,asc").await;
    assert_eq!(response.status(), 400);

    let response = app.get("/api/blog-posts?blogPostStatus.contains=EN").await;
    assert_eq!(response.status(), 500);

    // Unknown fields are ignored.
    let response = app.get("/api/blog-posts?nonsense.equals=1").await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn search_matches_folded_title_or_stripped_body() {
    let app = TestApp::new().await;
    let by_title = app
        .create_post(json!({
            "blogPostTitleVi": "Phản ứng Oxi hóa",
            "blogPostContentVi": "<p>khác</p>",
        }))
        .await;
    let by_body = app
        .create_post(json!({
            "blogPostTitleVi": "Tin tức",
            "blogPostContentVi": "<p>Thí nghiệm <b>oxi</b> <em>hóa</em> khử</p>",
        }))
        .await;
    let english = app
        .create_post(json!({
            "blogPostTitleVi": "Bài tiếng Anh",
            "blogPostTitleEn": "Oxidation basics",
            "blogPostContentEn": "<div>Redox <span>chemistry</span></div>",
        }))
        .await;

    let body = app
        .get_json("/api/blog-posts/search?queryString=OXI%20HOA&language=vi")
        .await;
    assert_eq!(ids(&body), vec![by_title, by_body]);

    // Markup never matches.
    let body = app
        .get_json("/api/blog-posts/search?queryString=span&language=en")
        .await;
    assert!(ids(&body).is_empty());

    let body = app
        .get_json("/api/blog-posts/search?queryString=redox%20chemistry&language=en")
        .await;
    assert_eq!(ids(&body), vec![english]);
}

#[tokio::test]
async fn carousel_shows_latest_published_enabled_posts() {
    let app = TestApp::with_config(|cfg| cfg.carousel_size = 2).await;

    let published = |title: &str, modified: &str| {
        json!({
            "blogPostTitleVi": title,
            "blogPostStatus": "ENABLED",
            "timeToPublish": "2024-01-01T00:00:00Z",
            "modifiedTime": modified,
        })
    };
    let old = app
        .create_post(published("Cũ", "2024-02-01T00:00:00Z"))
        .await;
    let newer = app
        .create_post(published("Mới", "2024-03-01T00:00:00Z"))
        .await;
    let newest = app
        .create_post(published("Mới nhất", "2024-04-01T00:00:00Z"))
        .await;
    app.create_post(json!({
        "blogPostTitleVi": "Nháp",
        "blogPostStatus": "DRAFT",
        "timeToPublish": "2024-01-01T00:00:00Z",
    }))
    .await;
    app.create_post(json!({
        "blogPostTitleVi": "Hẹn giờ",
        "blogPostStatus": "ENABLED",
        "timeToPublish": "2999-01-01T00:00:00Z",
    }))
    .await;

    let body = app.get_json("/api/blog-posts/blogpost-carousel").await;
    assert_eq!(ids(&body), vec![newest, newer]);
    assert!(!ids(&body).contains(&old));
    assert!(body[0].get("blogPostContentVi").is_none());
}
