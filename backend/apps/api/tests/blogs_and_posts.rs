mod common;

use axum::http::{Method, StatusCode};
use common::{TestApp, call};
use serde_json::json;

#[tokio::test]
async fn test_blog_writes_require_admin() {
    let app = TestApp::new();
    let body = json!({
        "name": "travel",
        "description": "Trips",
        "websiteUrl": "https://travel.example.com"
    });

    let response = app.send(call(Method::POST, "/blogs").json(body.clone())).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .send(call(Method::POST, "/blogs").bearer("not-a-token").json(body))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_blog_validation_errors() {
    let app = TestApp::new();
    let response = app
        .send(call(Method::POST, "/blogs").admin().json(json!({
            "name": "   ",
            "description": "ok",
            "websiteUrl": "ftp://nope"
        })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let fields = response.error_fields();
    assert!(fields.contains(&"name".to_string()));
    assert!(fields.contains(&"websiteUrl".to_string()));
    assert!(!fields.contains(&"description".to_string()));
}

#[tokio::test]
async fn test_blog_lifecycle() {
    let app = TestApp::new();
    let blog = app.create_blog("travel").await;
    let id = blog["id"].as_str().unwrap().to_string();

    assert_eq!(id.len(), 24);
    assert_eq!(blog["name"], "travel");
    assert_eq!(blog["isMembership"], false);
    assert!(blog["createdAt"].as_str().unwrap().ends_with('Z'));

    let response = app
        .send(call(Method::PUT, &format!("/blogs/{}", id)).admin().json(json!({
            "name": "food",
            "description": "Recipes",
            "websiteUrl": "https://food.example.com"
        })))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.send(call(Method::GET, &format!("/blogs/{}", id))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "food");
    assert_eq!(response.body["createdAt"], blog["createdAt"]);

    let response = app
        .send(call(Method::DELETE, &format!("/blogs/{}", id)).admin())
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.send(call(Method::GET, &format!("/blogs/{}", id))).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .send(call(Method::DELETE, &format!("/blogs/{}", id)).admin())
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let app = TestApp::new();
    let response = app.send(call(Method::GET, "/blogs/not-an-id")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.send(call(Method::GET, "/posts/123")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blog_search_sort_and_paging() {
    let app = TestApp::new();
    app.create_blog("alpha").await;
    app.create_blog("beta").await;
    app.create_blog("alphabet").await;

    let response = app
        .send(call(
            Method::GET,
            "/blogs?searchNameTerm=ALPHA&sortBy=name&sortDirection=asc&pageSize=1",
        ))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["totalCount"], 2);
    assert_eq!(response.body["pagesCount"], 2);
    assert_eq!(response.body["page"], 1);
    assert_eq!(response.body["pageSize"], 1);
    assert_eq!(response.body["items"][0]["name"], "alpha");

    let response = app
        .send(call(
            Method::GET,
            "/blogs?searchNameTerm=ALPHA&sortBy=name&sortDirection=asc&pageSize=1&pageNumber=2",
        ))
        .await;
    assert_eq!(response.body["items"][0]["name"], "alphabet");

    // unknown sort field falls back to createdAt desc
    let response = app.send(call(Method::GET, "/blogs?sortBy=bogus")).await;
    assert_eq!(response.body["totalCount"], 3);
    assert_eq!(response.body["pageSize"], 10);
}

#[tokio::test]
async fn test_posts_inside_blog() {
    let app = TestApp::new();
    let blog = app.create_blog("travel").await;
    let blog_id = blog["id"].as_str().unwrap();

    let post = app.create_post(blog_id, "First trip").await;
    assert_eq!(post["blogId"], blog_id);
    assert_eq!(post["blogName"], "travel");
    assert_eq!(post["extendedLikesInfo"]["likesCount"], 0);
    assert_eq!(post["extendedLikesInfo"]["dislikesCount"], 0);
    assert_eq!(post["extendedLikesInfo"]["myStatus"], "None");
    assert_eq!(post["extendedLikesInfo"]["newestLikes"], json!([]));

    app.create_post(blog_id, "Second trip").await;

    let response = app
        .send(call(Method::GET, &format!("/blogs/{}/posts?sortBy=title&sortDirection=asc", blog_id)))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["totalCount"], 2);
    assert_eq!(response.body["items"][0]["title"], "First trip");

    let missing_blog = "0123456789abcdef01234567";
    let response = app
        .send(call(Method::GET, &format!("/blogs/{}/posts", missing_blog)))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .send(
            call(Method::POST, &format!("/blogs/{}/posts", missing_blog))
                .admin()
                .json(json!({
                    "title": "t",
                    "shortDescription": "s",
                    "content": "c"
                })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_posts_collection() {
    let app = TestApp::new();
    let blog = app.create_blog("travel").await;
    let blog_id = blog["id"].as_str().unwrap();

    let response = app
        .send(call(Method::POST, "/posts").admin().json(json!({
            "title": "Hello",
            "shortDescription": "Short",
            "content": "Body",
            "blogId": blog_id
        })))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let post_id = response.body["id"].as_str().unwrap().to_string();

    let response = app
        .send(call(Method::POST, "/posts").admin().json(json!({
            "title": "Hello",
            "shortDescription": "Short",
            "content": "Body",
            "blogId": "0123456789abcdef01234567"
        })))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.error_fields(), vec!["blogId"]);

    let response = app
        .send(call(Method::POST, "/posts").admin().json(json!({
            "title": "",
            "shortDescription": "Short",
            "content": "Body",
            "blogId": "garbage"
        })))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let fields = response.error_fields();
    assert!(fields.contains(&"title".to_string()));
    assert!(fields.contains(&"blogId".to_string()));

    let response = app
        .send(call(Method::PUT, &format!("/posts/{}", post_id)).admin().json(json!({
            "title": "Edited",
            "shortDescription": "Short",
            "content": "Body",
            "blogId": blog_id
        })))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.send(call(Method::GET, "/posts")).await;
    assert_eq!(response.body["totalCount"], 1);
    assert_eq!(response.body["items"][0]["title"], "Edited");

    let response = app
        .send(call(Method::DELETE, &format!("/posts/{}", post_id)).admin())
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = app.send(call(Method::GET, &format!("/posts/{}", post_id))).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wipe_all_data() {
    let app = TestApp::new();
    let blog = app.create_blog("travel").await;
    app.create_post(blog["id"].as_str().unwrap(), "Trip").await;
    app.create_user("alice").await;

    let response = app.send(call(Method::DELETE, "/testing/all-data")).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.send(call(Method::GET, "/blogs")).await;
    assert_eq!(response.body["totalCount"], 0);
    let response = app.send(call(Method::GET, "/posts")).await;
    assert_eq!(response.body["totalCount"], 0);
    let response = app.send(call(Method::GET, "/users").admin()).await;
    assert_eq!(response.body["totalCount"], 0);
}
