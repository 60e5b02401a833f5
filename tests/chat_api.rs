mod common;

use actix_web::{App, http::StatusCode, test};
use serde_json::{Value, json};

use common::TestContext;
use mentorhub_backend::routes::configure_routes;

#[actix_web::test]
async fn conversation_round_trip_tracks_unread_counts() {
    let ctx = TestContext::new();
    let alice = ctx.mentee("Ayu Ratna", "ayu@example.com").await;
    let budi = ctx.mentee("Budi Santoso", "budi@example.com").await;
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .insert_header(alice.bearer())
        .set_json(json!({ "participant_id": alice.id.to_hex() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .insert_header(alice.bearer())
        .set_json(json!({ "participant_id": budi.id.to_hex() }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let chat_id = body["data"]["id"].as_str().unwrap().to_string();

    // Opening from the other side returns the same conversation.
    let req = test::TestRequest::post()
        .uri("/api/chat")
        .insert_header(budi.bearer())
        .set_json(json!({ "participant_id": alice.id.to_hex() }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["id"], chat_id.as_str());

    let req = test::TestRequest::post()
        .uri(&format!("/api/chat/{}/messages", chat_id))
        .insert_header(alice.bearer())
        .set_json(json!({ "body": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    for text in ["Halo Budi", "Are you free on Friday?"] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/chat/{}/messages", chat_id))
            .insert_header(alice.bearer())
            .set_json(json!({ "body": text }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/chat")
        .insert_header(budi.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["unread"], 2);
    assert_eq!(body["data"][0]["last_message"]["body"], "Are you free on Friday?");

    let req = test::TestRequest::get()
        .uri("/api/chat")
        .insert_header(alice.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"][0]["unread"], 0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/chat/{}/messages?page=1&limit=1", chat_id))
        .insert_header(budi.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["items"][0]["body"], "Are you free on Friday?");

    let req = test::TestRequest::get()
        .uri("/api/notifications?unread_only=true")
        .insert_header(budi.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["items"][0]["kind"], "new_message");

    let req = test::TestRequest::post()
        .uri(&format!("/api/chat/{}/read", chat_id))
        .insert_header(budi.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["unread"], 0);
}

#[actix_web::test]
async fn outsiders_cannot_read_a_conversation() {
    let ctx = TestContext::new();
    let alice = ctx.mentee("Citra Kirana", "citra@example.com").await;
    let budi = ctx.mentee("Dodi Prasetyo", "dodi@example.com").await;
    let eve = ctx.mentee("Eka Putri", "eka@example.com").await;
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/chat")
        .insert_header(alice.bearer())
        .set_json(json!({ "participant_id": budi.id.to_hex() }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let chat_id = body["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/chat/{}/messages", chat_id))
        .insert_header(eve.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/api/chat/{}/messages", chat_id))
        .insert_header(eve.bearer())
        .set_json(json!({ "body": "hi" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
