//! Guide authoring, visibility and cover images against a migrated database.

mod support;

use serde_json::{json, Value};
use uuid::Uuid;

use support::{db_app, TestApp};

async fn make_instructor(app: &TestApp, token: &str) {
    let (status, body) = app.json("PUT", "/users/me/details", Some(token), Some(json!({"is_instructor": true}))).await;
    assert_eq!(status, 200, "{body}");
    assert_eq!(body["is_instructor"], true);
}

fn titles(page: &Value) -> Vec<String> {
    page["guides"]
        .as_array()
        .map(|g| g.iter().filter_map(|x| x["title"].as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn only_instructors_author_guides() {
    let Some(app) = db_app().await else { return };
    let (_, token, _) = app.active_user("secret-pass").await;
    let guide = json!({"title": "First steps", "content": "Body"});

    let (status, body) = app.json("POST", "/guides", Some(&token), Some(guide.clone())).await;
    assert_eq!(status, 403);
    assert_eq!(body["detail"], "User is not an instructor");

    make_instructor(&app, &token).await;
    let (status, body) = app.json("POST", "/guides", Some(&token), Some(guide)).await;
    assert_eq!(status, 201, "{body}");
    assert_eq!(body["title"], "First steps");
    assert_eq!(body["published"], false);

    let (status, _) = app.json("POST", "/guides", Some(&token), Some(json!({"title": "  ", "content": "Body"}))).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn drafts_stay_with_their_author() {
    let Some(app) = db_app().await else { return };
    let (author_id, author, _) = app.active_user("secret-pass").await;
    let (_, reader, _) = app.active_user("secret-pass").await;
    make_instructor(&app, &author).await;

    let (_, draft) = app.json("POST", "/guides", Some(&author), Some(json!({"title": "Draft", "content": "wip"}))).await;
    let draft_id = draft["guide_id"].as_i64().unwrap();

    let (status, _) = app.json("GET", &format!("/guides/guide/{draft_id}"), Some(&reader), None).await;
    assert_eq!(status, 404);
    let (status, body) = app.json("GET", &format!("/guides/guide/{draft_id}"), Some(&author), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["user"]["user_id"].as_i64(), Some(author_id as i64));

    // the reader sees no guides of this author until one is published
    let (status, body) = app.json("GET", &format!("/guides/{author_id}"), Some(&reader), None).await;
    assert_eq!(status, 404);
    assert_eq!(body["detail"], "Guides not found");
    let (status, body) = app.json("GET", &format!("/guides/{author_id}"), Some(&author), None).await;
    assert_eq!(status, 200);
    assert_eq!(titles(&body), vec!["Draft"]);

    let (status, body) = app
        .json("PUT", &format!("/guides/{draft_id}"), Some(&author), Some(json!({"title": "Draft", "content": "done", "published": true})))
        .await;
    assert_eq!(status, 201, "{body}");
    let (status, body) = app.json("GET", &format!("/guides/{author_id}"), Some(&reader), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["pages"], 1);

    let (status, _) = app.json("GET", &format!("/guides/{author_id}?page=2"), Some(&reader), None).await;
    assert_eq!(status, 404);

    let (status, body) = app.json("GET", "/guides/guide/not-a-number", Some(&reader), None).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid Request");
}

#[tokio::test]
async fn search_matches_title_fragments() {
    let Some(app) = db_app().await else { return };
    let (_, token, _) = app.active_user("secret-pass").await;
    make_instructor(&app, &token).await;

    let tag = Uuid::new_v4().simple().to_string();
    for (title, published) in [(format!("Rust {tag} basics"), true), (format!("RUST {tag} advanced"), true), (format!("rust {tag} hidden"), false)] {
        let (status, _) = app
            .json("POST", "/guides", Some(&token), Some(json!({"title": title, "content": "c", "published": published})))
            .await;
        assert_eq!(status, 201);
    }

    let (status, body) = app.json("GET", &format!("/guides/search?title={}", tag.to_uppercase()), None, None).await;
    assert_eq!(status, 200, "{body}");
    let mut found = titles(&body);
    found.sort();
    assert_eq!(found, vec![format!("RUST {tag} advanced"), format!("Rust {tag} basics")]);

    let (status, body) = app.json("GET", &format!("/guides/search?title={tag}&page_size=1"), None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["pages"], 2);

    let (status, body) = app.json("GET", &format!("/guides/search?title={tag}_%25"), None, None).await;
    assert_eq!(status, 404);
    assert_eq!(body["detail"], "Guides not found");

    let (status, body) = app.json("GET", "/guides?page_size=1&order=asc", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["guides"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn owners_manage_covers_and_deletion() {
    let Some(app) = db_app().await else { return };
    let (_, owner, _) = app.active_user("secret-pass").await;
    let (_, other, _) = app.active_user("secret-pass").await;
    make_instructor(&app, &owner).await;
    make_instructor(&app, &other).await;

    let (_, guide) = app
        .json("POST", "/guides", Some(&owner), Some(json!({"title": "Covered", "content": "c", "published": true})))
        .await;
    let id = guide["guide_id"].as_i64().unwrap();
    let cover_uri = format!("/guides/cover_image?guide_id={id}");

    let (status, _) = app.json("GET", &cover_uri, Some(&owner), None).await;
    assert_eq!(status, 404);

    let (status, body) = app.upload("POST", &cover_uri, &owner, "image/jpeg", b"\xff\xd8\xff fake jpeg").await;
    assert_eq!(status, 201, "{body}");
    let first = body["cover_image"].as_str().unwrap().to_string();
    assert!(first.starts_with(&format!("guides/{id}/")));
    assert!(first.ends_with(".jpg"));

    let (status, _) = app.upload("POST", &cover_uri, &other, "image/jpeg", b"\xff\xd8\xff").await;
    assert_eq!(status, 401);
    let (status, _) = app.upload("PUT", &cover_uri, &owner, "text/plain", b"hello").await;
    assert_eq!(status, 400);

    let (status, body) = app.upload("PUT", &cover_uri, &owner, "image/png", b"\x89PNG").await;
    assert_eq!(status, 200);
    let second = body["cover_image"].as_str().unwrap().to_string();
    let root = std::path::Path::new(&app.cfg.media.root);
    assert!(root.join(&second).exists());
    assert!(!root.join(&first).exists());

    let (status, body) = app.json("GET", &cover_uri, Some(&other), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["cover_image"], second.as_str());

    let (status, body) = app
        .json("PUT", &format!("/guides/{id}"), Some(&other), Some(json!({"title": "Mine now", "content": "c"})))
        .await;
    assert_eq!(status, 401);
    assert_eq!(body["detail"], "Unauthorized");
    let (status, _) = app.json("DELETE", &format!("/guides/{id}"), Some(&other), None).await;
    assert_eq!(status, 401);

    let (status, _) = app.json("DELETE", &format!("/guides/{id}"), Some(&owner), None).await;
    assert_eq!(status, 204);
    assert!(!root.join(&second).exists());
    let (status, _) = app.json("GET", &format!("/guides/guide/{id}"), Some(&owner), None).await;
    assert_eq!(status, 404);
}
