mod common;

use actix_web::{App, http::StatusCode, test};
use serde_json::{Value, json};

use common::{PASSWORD, TestContext};
use mentorhub_backend::routes::configure_routes;

#[actix_web::test]
async fn register_reports_every_invalid_field() {
    let ctx = TestContext::new();
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "", "email": "not-an-email", "password": "short" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let details = &body["error"]["details"];
    assert!(details.get("name").is_some());
    assert!(details.get("email").is_some());
    assert!(details.get("password").is_some());
}

#[actix_web::test]
async fn register_then_login() {
    let ctx = TestContext::new();
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Rina Wijaya", "email": "Rina@Example.com", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["email"], "rina@example.com");
    assert!(body["data"].get("password").is_none());

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "Rina Again", "email": "rina@example.com", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("Accept-Language", "id"))
        .set_json(json!({ "email": "rina@example.com", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Berhasil masuk");
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert!(body["data"]["access_token"].as_str().is_some());
}

#[actix_web::test]
async fn login_rejects_wrong_password_and_bad_shape() {
    let ctx = TestContext::new();
    ctx.mentee("Budi Santoso", "budi@example.com").await;
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "budi@example.com", "password": "Wr0ng!pass" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "budi", "password": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn refresh_rotates_and_reuse_revokes_the_family() {
    let ctx = TestContext::new();
    let account = ctx.mentee("Citra Lestari", "citra@example.com").await;
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({ "refresh_token": account.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let rotated = body["data"]["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(rotated, account.refresh_token);

    // Replaying the first token is treated as theft.
    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({ "refresh_token": account.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({ "refresh_token": rotated }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_revokes_refresh_token() {
    let ctx = TestContext::new();
    let account = ctx.mentee("Dewi Sartika", "dewi@example.com").await;
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/auth/logout")
            .set_json(json!({ "refresh_token": account.refresh_token }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/api/auth/refresh")
        .set_json(json!({ "refresh_token": account.refresh_token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn protected_routes_need_a_bearer_token() {
    let ctx = TestContext::new();
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::get().uri("/api/users/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/users/me")
        .insert_header(("Authorization", "Bearer garbage"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
