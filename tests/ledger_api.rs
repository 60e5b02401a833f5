mod common;

use actix_web::{App, http::StatusCode, test};
use serde_json::{Value, json};

use common::{TestContext, next_week, oid};
use mentorhub_backend::routes::configure_routes;

#[actix_web::test]
async fn add_funds_is_idempotent_per_key() {
    let ctx = TestContext::new();
    let user = ctx.mentee("Agus Salim", "agus@example.com").await;
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/transactions/add-funds")
            .insert_header(user.bearer())
            .set_json(json!({ "amount": 2500, "idempotency_key": "topup-1" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::post()
        .uri("/api/transactions/add-funds")
        .insert_header(user.bearer())
        .set_json(json!({ "amount": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/transactions/balance")
        .insert_header(user.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["balance"], 2500);

    let req = test::TestRequest::get()
        .uri("/api/transactions?limit=10")
        .insert_header(user.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["kind"], "add_funds");
    assert_eq!(body["data"]["items"][0]["balance_after"], 2500);
}

#[actix_web::test]
async fn purchase_records_structured_credits() {
    let ctx = TestContext::new();
    let user = ctx.mentee("Bayu Aji", "bayu@example.com").await;
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/transactions/purchase")
        .insert_header(user.bearer())
        .set_json(json!({ "credits": 30 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["credits"], 30);
    assert_eq!(body["data"]["amount"], 3000);
    let id = oid(&body["data"]);

    let req = test::TestRequest::get()
        .uri(&format!("/api/transactions/{}", id))
        .insert_header(user.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Rows of other users are invisible.
    let other = ctx.mentee("Cahya Dinata", "cahya@example.com").await;
    let req = test::TestRequest::get()
        .uri(&format!("/api/transactions/{}", id))
        .insert_header(other.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn failed_payout_is_returned_and_ledger_reconciles() {
    let ctx = TestContext::new();
    let mentor = ctx
        .mentor("Dimas Anggara", "dimas@example.com", &["Go"], 6000, next_week())
        .await;
    let mentee = ctx.mentee("Endah Lestari", "endah@example.com").await;
    let admin = ctx.admin("finance@example.com").await;
    ctx.fund(&mentor.id, 8000).await;
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/transactions/payout")
        .insert_header(mentee.bearer())
        .set_json(json!({ "amount": 5000 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/transactions/payout")
        .insert_header(mentor.bearer())
        .set_json(json!({ "amount": 100 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/transactions/payout")
        .insert_header(mentor.bearer())
        .set_json(json!({ "amount": 6000 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "pending");
    let payout_id = oid(&body["data"]);
    assert_eq!(ctx.balance(&mentor.id).await, 2000);

    let req = test::TestRequest::get()
        .uri("/api/admin/payouts/pending")
        .insert_header(admin.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/admin/payouts/{}", payout_id))
        .insert_header(admin.bearer())
        .set_json(json!({ "status": "failed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.balance(&mentor.id).await, 8000);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/admin/payouts/{}", payout_id))
        .insert_header(admin.bearer())
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/admin/ledger/reconcile/{}", mentor.id.to_hex()))
        .insert_header(admin.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["drift"], 0);
    assert_eq!(body["data"]["balance"], 8000);
}

#[actix_web::test]
async fn admin_adjustment_respects_the_floor() {
    let ctx = TestContext::new();
    let user = ctx.mentee("Fitri Handayani", "fitri@example.com").await;
    let admin = ctx.admin("support@example.com").await;
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/ledger/adjust")
        .insert_header(admin.bearer())
        .set_json(json!({ "user_id": user.id.to_hex(), "amount": 1500, "reason": "Goodwill" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/admin/ledger/adjust")
        .insert_header(admin.bearer())
        .set_json(json!({ "user_id": user.id.to_hex(), "amount": -2000, "reason": "Chargeback" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
    assert_eq!(ctx.balance(&user.id).await, 1500);

    let req = test::TestRequest::post()
        .uri("/api/admin/ledger/adjust")
        .insert_header(user.bearer())
        .set_json(json!({ "user_id": user.id.to_hex(), "amount": 100, "reason": "Self-serve" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
