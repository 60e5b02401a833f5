mod common;

use actix_web::{App, http::StatusCode, test};
use bson::oid::ObjectId;
use chrono::Utc;
use futures::future::join_all;
use serde_json::{Value, json};

use common::{TestContext, next_week, oid};
use mentorhub_backend::{
    repositories::session_repository::SessionRepository,
    routes::configure_routes,
    types::requests::session::book_session_request::BookSessionRequest,
    utils::validation_utils::validate_booking_data,
};

fn booking(mentor: &str, start: &str, duration: u32) -> Value {
    json!({
        "mentor_id": mentor,
        "topic": "rust",
        "scheduled_date": next_week(),
        "start_time": start,
        "duration": duration
    })
}

#[actix_web::test]
async fn booking_debits_and_cancel_refunds_once() {
    let ctx = TestContext::new();
    let mentor = ctx
        .mentor("Indra Kusuma", "indra@example.com", &["Rust"], 6000, next_week())
        .await;
    let mentee = ctx.mentee("Joko Widodo", "joko@example.com").await;
    ctx.fund(&mentee.id, 10_000).await;
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(mentee.bearer())
        .set_json(booking(&mentor.id.to_hex(), "10:00", 60))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["price"], 6000);
    let session_id = oid(&body["data"]);
    assert_eq!(ctx.balance(&mentee.id).await, 4000);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/sessions/{}/status", session_id))
        .insert_header(mentor.bearer())
        .set_json(json!({ "status": "cancelled", "reason": "Sick" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.balance(&mentee.id).await, 10_000);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/sessions/{}/status", session_id))
        .insert_header(mentor.bearer())
        .set_json(json!({ "status": "cancelled" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(ctx.balance(&mentee.id).await, 10_000);

    let admin = ctx.admin("ops@example.com").await;
    let req = test::TestRequest::get()
        .uri("/api/admin/ledger/reconcile")
        .insert_header(admin.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"], json!([]));
}

#[actix_web::test]
async fn only_the_mentor_drives_a_confirmed_session() {
    let ctx = TestContext::new();
    let mentor = ctx
        .mentor("Kartika Sari", "kartika@example.com", &["Rust"], 6000, next_week())
        .await;
    let mentee = ctx.mentee("Lukas Hartono", "lukas@example.com").await;
    ctx.fund(&mentee.id, 6000).await;
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(mentee.bearer())
        .set_json(booking(&mentor.id.to_hex(), "09:00", 60))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let status_uri = format!("/api/sessions/{}/status", oid(&body["data"]));

    let req = test::TestRequest::patch()
        .uri(&status_uri)
        .insert_header(mentee.bearer())
        .set_json(json!({ "status": "confirmed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::patch()
        .uri(&status_uri)
        .insert_header(mentor.bearer())
        .set_json(json!({ "status": "pending" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::patch()
        .uri(&status_uri)
        .insert_header(mentor.bearer())
        .set_json(json!({ "status": "confirmed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Past pending, the mentee can no longer cancel.
    let req = test::TestRequest::patch()
        .uri(&status_uri)
        .insert_header(mentee.bearer())
        .set_json(json!({ "status": "cancelled" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let stranger = ctx.mentee("Maya Anggraini", "maya@example.com").await;
    let req = test::TestRequest::patch()
        .uri(&status_uri)
        .insert_header(stranger.bearer())
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::patch()
        .uri(&status_uri)
        .insert_header(mentor.bearer())
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.balance(&mentor.id).await, 6000);
    assert_eq!(ctx.balance(&mentee.id).await, 0);

    let feedback_uri = status_uri.replace("/status", "/feedback");
    let req = test::TestRequest::post()
        .uri(&feedback_uri)
        .insert_header(mentee.bearer())
        .set_json(json!({ "rating": 5, "comment": "Clear and practical" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(&feedback_uri)
        .insert_header(mentee.bearer())
        .set_json(json!({ "rating": 4 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn mentee_may_cancel_own_pending_booking() {
    let ctx = TestContext::new();
    let mentor = ctx
        .mentor("Nadia Putri", "nadia@example.com", &["Rust"], 6000, next_week())
        .await;
    let mentee = ctx.mentee("Oki Setiawan", "oki@example.com").await;
    ctx.fund(&mentee.id, 3000).await;
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(mentee.bearer())
        .set_json(booking(&mentor.id.to_hex(), "14:00", 30))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ctx.balance(&mentee.id).await, 0);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/sessions/{}/status", oid(&body["data"])))
        .insert_header(mentee.bearer())
        .set_json(json!({ "status": "cancelled" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.balance(&mentee.id).await, 3000);
}

#[actix_web::test]
async fn booking_checks_funds_calendar_and_topic() {
    let ctx = TestContext::new();
    let mentor = ctx
        .mentor("Putu Ayu", "putu@example.com", &["Rust"], 6000, next_week())
        .await;
    let first = ctx.mentee("Rudi Hartono", "rudi@example.com").await;
    let second = ctx.mentee("Sinta Dewi", "sinta@example.com").await;
    ctx.fund(&first.id, 6000).await;
    ctx.fund(&second.id, 1000).await;
    let mentor_id = mentor.id.to_hex();
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(second.bearer())
        .set_json(booking(&mentor_id, "10:00", 60))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYMENT_REQUIRED);
    assert_eq!(ctx.balance(&second.id).await, 1000);

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(first.bearer())
        .set_json(booking(&mentor_id, "16:30", 60))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let mut off_topic = booking(&mentor_id, "10:00", 60);
    off_topic["topic"] = json!("Pottery");
    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(first.bearer())
        .set_json(off_topic)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(first.bearer())
        .set_json(booking(&mentor_id, "10:00", 60))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Overlaps the booked 10:00-11:00 window.
    ctx.fund(&second.id, 5000).await;
    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(second.bearer())
        .set_json(booking(&mentor_id, "10:30", 30))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Touching windows are fine.
    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header(second.bearer())
        .set_json(booking(&mentor_id, "11:00", 30))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/mentors/{}/free-windows?date={}",
            mentor_id,
            next_week()
        ))
        .insert_header(first.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body["data"],
        json!([
            { "start_time": "09:00", "end_time": "10:00" },
            { "start_time": "11:30", "end_time": "17:00" }
        ])
    );
}

#[tokio::test]
async fn concurrent_bookings_never_overdraw() {
    let ctx = TestContext::new();
    let mentor = ctx
        .mentor("Tono Prasetyo", "tono@example.com", &["Rust"], 6000, next_week())
        .await;
    let mentee = ctx.mentee("Umi Kalsum", "umi@example.com").await;
    ctx.fund(&mentee.id, 13_000).await;

    let requests: Vec<BookSessionRequest> = ["09:00", "10:00", "11:00", "12:00", "13:00"]
        .iter()
        .map(|start| BookSessionRequest {
            mentor_id: mentor.id.to_hex(),
            topic: "Rust".to_string(),
            description: None,
            scheduled_date: next_week(),
            start_time: start.to_string(),
            duration: 60,
        })
        .collect();

    let now = Utc::now().naive_utc();
    let attempts = requests.iter().map(|request| {
        let window = validate_booking_data(request, now, &ctx.messages).unwrap();
        ctx.services
            .sessions
            .book(&mentee.id, request, window, &ctx.messages)
    });
    let results = join_all(attempts).await;

    let booked = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(booked, 2);
    assert_eq!(ctx.balance(&mentee.id).await, 1000);

    let report = ctx
        .services
        .ledger
        .reconcile_user(&mentee.id, &ctx.messages)
        .await
        .unwrap();
    assert!(report.is_consistent());
}

#[actix_web::test]
async fn group_session_seats_and_departures() {
    let ctx = TestContext::new();
    let mentor = ctx
        .mentor("Vina Melati", "vina@example.com", &["Rust"], 6000, next_week())
        .await;
    let alice = ctx.mentee("Wulan Sari", "wulan@example.com").await;
    let bob = ctx.mentee("Yoga Pratama", "yoga@example.com").await;
    let carol = ctx.mentee("Zaki Ramadhan", "zaki@example.com").await;
    for account in [&alice, &bob, &carol] {
        ctx.fund(&account.id, 6000).await;
    }
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/sessions/group")
        .insert_header(mentor.bearer())
        .set_json(json!({
            "topic": "Rust",
            "scheduled_date": next_week(),
            "start_time": "13:00",
            "duration": 60,
            "capacity": 2
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "confirmed");
    let session_uri = format!("/api/sessions/{}", oid(&body["data"]));

    for account in [&alice, &bob] {
        let req = test::TestRequest::post()
            .uri(&format!("{}/join", session_uri))
            .insert_header(account.bearer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri(&format!("{}/join", session_uri))
        .insert_header(carol.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(ctx.balance(&carol.id).await, 6000);

    let req = test::TestRequest::post()
        .uri(&format!("{}/leave", session_uri))
        .insert_header(alice.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.balance(&alice.id).await, 6000);

    // A mentee who left cannot take the seat again.
    let req = test::TestRequest::post()
        .uri(&format!("{}/join", session_uri))
        .insert_header(alice.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(ctx.balance(&alice.id).await, 6000);

    let req = test::TestRequest::post()
        .uri(&format!("{}/join", session_uri))
        .insert_header(carol.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::patch()
        .uri(&format!("{}/status", session_uri))
        .insert_header(mentor.bearer())
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.balance(&mentor.id).await, 12_000);
}

#[actix_web::test]
async fn completion_pays_only_for_settled_seats() {
    let ctx = TestContext::new();
    let mentor = ctx
        .mentor("Rizky Hakim", "rizky@example.com", &["Rust"], 6000, next_week())
        .await;
    let paying = ctx.mentee("Sinta Dewi", "sinta@example.com").await;
    let unpaid = ctx.mentee("Teguh Wibowo", "teguh@example.com").await;
    ctx.fund(&paying.id, 6000).await;
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri("/api/sessions/group")
        .insert_header(mentor.bearer())
        .set_json(json!({
            "topic": "Rust",
            "scheduled_date": next_week(),
            "start_time": "10:00",
            "duration": 60,
            "capacity": 3
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let session_hex = oid(&body["data"]);
    let session_id = ObjectId::parse_str(&session_hex).unwrap();
    let session_uri = format!("/api/sessions/{}", session_hex);

    let req = test::TestRequest::post()
        .uri(&format!("{}/join", session_uri))
        .insert_header(paying.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // A seat held by a join whose payment has not landed yet.
    ctx.repositories
        .sessions
        .add_mentee(&session_id, &unpaid.id)
        .await
        .unwrap()
        .expect("seat reserved");

    let req = test::TestRequest::patch()
        .uri(&format!("{}/status", session_uri))
        .insert_header(mentor.bearer())
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.balance(&mentor.id).await, 6000);

    let req = test::TestRequest::post()
        .uri(&format!("{}/feedback", session_uri))
        .insert_header(unpaid.bearer())
        .set_json(json!({ "rating": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The failed payment releases the seat even though the session is over.
    let released = ctx
        .repositories
        .sessions
        .remove_mentee(&session_id, &unpaid.id, false)
        .await
        .unwrap()
        .expect("seat released");
    assert_eq!(released.mentees, vec![paying.id]);

    let report = ctx
        .services
        .ledger
        .reconcile_user(&mentor.id, &ctx.messages)
        .await
        .unwrap();
    assert_eq!(report.drift, 0);
}
