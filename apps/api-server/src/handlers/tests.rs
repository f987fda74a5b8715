//! End-to-end use-case tests over an in-memory SQLite database,
//! driven through the real routes and extractors.

use actix_web::cookie::Cookie;
use actix_web::{App, http::StatusCode, test, web};
use serde_json::json;

use quill_infra::auth::SessionConfig;
use quill_infra::database::DatabaseConfig;
use quill_shared::ApiResponse;
use quill_shared::dto::{AuthResponse, PostDetailResponse, PostResponse};

use crate::config::AppConfig;
use crate::handlers::configure_routes;
use crate::state::AppState;

const ADMIN_EMAIL: &str = "admin@example.com";

fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        admin_email: Some(ADMIN_EMAIL.to_string()),
        session: SessionConfig {
            secret: "test-secret".to_string(),
            ttl_hours: 1,
            issuer: "quill-test".to_string(),
        },
        database: DatabaseConfig {
            // a single pooled connection keeps the in-memory db alive
            // and shared across requests
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
    }
}

async fn test_state() -> AppState {
    AppState::new(&test_config()).await.expect("test state")
}

fn session_of(resp: &actix_web::dev::ServiceResponse) -> Cookie<'static> {
    resp.response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned()
}

fn register_json(email: &str, name: &str) -> serde_json::Value {
    json!({ "email": email, "password": "password123", "name": name })
}

fn post_json(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "subtitle": "A subtitle",
        "body": "<p>Body</p>",
        "img_url": "https://example.com/cover.png",
    })
}

#[actix_web::test]
async fn test_register_duplicate_and_login() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;

    // Register succeeds, normalizes the name, and signs the user in
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/register")
            .set_json(register_json("a@x.com", "alice wonder"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let session = session_of(&resp);
    let body: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(body.user.email, "a@x.com");
    assert_eq!(body.user.name, "Alice Wonder");
    assert!(!body.user.is_admin);
    let alice_id = body.user.id;

    // Logout requires the session and clears it
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/logout")
            .cookie(session.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/logout").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // A second registration with the same email writes no second row
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/register")
            .set_json(register_json("a@x.com", "imposter"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["redirect"], "/login");
    let stored = state.users.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(stored.name, "Alice Wonder");

    // Wrong password and unknown email are distinguishable
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "a@x.com", "password": "wrongpw12" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Password incorrect. Please try again.");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "nobody@x.com", "password": "password123" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "That email does not exist, please try again.");

    // Correct credentials resolve to the same user
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "a@x.com", "password": "password123" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(body.user.id, alice_id);
}

#[actix_web::test]
async fn test_short_password_rejected() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/register")
            .set_json(json!({ "email": "a@x.com", "password": "short", "name": "Alice" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_only_admin_mutates_posts() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/register")
            .set_json(register_json("a@x.com", "alice"))
            .to_request(),
    )
    .await;
    let alice = session_of(&resp);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/register")
            .set_json(register_json(ADMIN_EMAIL, "site owner"))
            .to_request(),
    )
    .await;
    let admin = session_of(&resp);
    let body: AuthResponse = test::read_body_json(resp).await;
    assert!(body.user.is_admin);
    let admin_id = body.user.id;

    // Unauthenticated and non-admin actors get a hard 403
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/new-post")
            .set_json(post_json("First Post"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/new-post")
            .cookie(alice.clone())
            .set_json(post_json("First Post"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["redirect"].is_null());

    // Malformed image URL never reaches the store
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/new-post")
            .cookie(admin.clone())
            .set_json(json!({
                "title": "First Post",
                "subtitle": "A subtitle",
                "body": "<p>Body</p>",
                "img_url": "not a url",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    // The admin creates the post, stamped with today's date
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/new-post")
            .cookie(admin.clone())
            .set_json(post_json("First Post"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: ApiResponse<PostResponse> = test::read_body_json(resp).await;
    let post = body.data.unwrap();
    assert_eq!(post.author_id, admin_id);
    let today = chrono::Utc::now().format("%B %d, %Y").to_string();
    assert_eq!(post.date, today);

    // Editing touches the fields but not date or author
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/edit-post/{}", post.id))
            .cookie(admin.clone())
            .set_json(post_json("First Post, Revised"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<PostResponse> = test::read_body_json(resp).await;
    let edited = body.data.unwrap();
    assert_eq!(edited.title, "First Post, Revised");
    assert_eq!(edited.date, today);
    assert_eq!(edited.author_id, admin_id);

    // Non-admin edit and delete are refused
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/edit-post/{}", post.id))
            .cookie(alice.clone())
            .set_json(post_json("Hijacked"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/delete/{}", post.id))
            .cookie(alice)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Editing a missing post is NotFound
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/edit-post/999")
            .cookie(admin)
            .set_json(post_json("Ghost"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_comments_and_delete_cascade() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/register")
            .set_json(register_json(ADMIN_EMAIL, "site owner"))
            .to_request(),
    )
    .await;
    let admin = session_of(&resp);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/register")
            .set_json(register_json("a@x.com", "alice"))
            .to_request(),
    )
    .await;
    let alice = session_of(&resp);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/new-post")
            .cookie(admin.clone())
            .set_json(post_json("First Post"))
            .to_request(),
    )
    .await;
    let body: ApiResponse<PostResponse> = test::read_body_json(resp).await;
    let post_id = body.data.unwrap().id;

    // An unauthenticated comment creates nothing and signals login
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/post/{}", post_id))
            .set_json(json!({ "body": "drive-by" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["redirect"], "/login?login_to_comment=true");

    // A signed-in reader comments
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/post/{}", post_id))
            .cookie(alice.clone())
            .set_json(json!({ "body": "Nice post!" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Commenting on a missing post is NotFound
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/post/999")
            .cookie(alice.clone())
            .set_json(json!({ "body": "into the void" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // The post view carries the comment and the viewer's comment gate
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/post/{}", post_id))
            .cookie(alice.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: ApiResponse<PostDetailResponse> = test::read_body_json(resp).await;
    let detail = body.data.unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].author_name, "Alice");
    assert!(detail.can_comment);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/post/{}", post_id))
            .to_request(),
    )
    .await;
    let body: ApiResponse<PostDetailResponse> = test::read_body_json(resp).await;
    assert!(!body.data.unwrap().can_comment);

    // Deleting the post sweeps its comments in the same transaction
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/delete/{}", post_id))
            .cookie(admin.clone())
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/post/{}", post_id))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let orphans = state.comments.list_for_post(post_id).await.unwrap();
    assert!(orphans.is_empty());

    // Deleting again is NotFound
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/delete/{}", post_id))
            .cookie(admin)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_stale_session_resolves_to_unauthenticated() {
    let state = test_state().await;
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;

    // A signed token for a user id that was never registered: the
    // session validates but resolves to no actor.
    let token = state.sessions.issue(999).unwrap();
    let stale = Cookie::new("session", token);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/new-post")
            .cookie(stale.clone())
            .set_json(post_json("Ghost Post"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/login?login_to_comment=true")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "You need to login or register to comment.");
}
