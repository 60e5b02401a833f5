mod common;

use actix_web::{App, http::StatusCode, test};
use serde_json::Value;

use common::{TestContext, oid};
use mentorhub_backend::{
    routes::configure_routes,
    services::notification_service::{NOTIFICATION_EVENT, NewNotification},
    types::models::notification::NotificationKind,
};

async fn unread(ctx: &TestContext, account: &common::Account) -> u64 {
    ctx.services.notifications.unread_count(&account.id).await.unwrap()
}

#[actix_web::test]
async fn stored_notification_is_pushed_to_the_recipient_room() {
    let ctx = TestContext::new();
    let user = ctx.mentee("Gita Savitri", "gita@example.com").await;
    let other = ctx.mentee("Hadi Kusuma", "hadi@example.com").await;
    let (_, mut inbox) = ctx.services.hub.join(&user.id.to_hex());
    let (_, mut other_inbox) = ctx.services.hub.join(&other.id.to_hex());

    let stored = ctx
        .services
        .notifications
        .notify(NewNotification::new(
            user.id,
            NotificationKind::PayoutUpdated,
            "Payout updated",
            "Your payout is completed",
        ))
        .await
        .unwrap();

    let frame: Value = serde_json::from_str(&inbox.try_recv().unwrap()).unwrap();
    assert_eq!(frame["event"], NOTIFICATION_EVENT);
    assert_eq!(oid(&frame["data"]), stored.id.to_hex());
    assert_eq!(frame["data"]["title"], "Payout updated");
    assert!(other_inbox.try_recv().is_err());
}

#[actix_web::test]
async fn read_and_delete_are_scoped_to_the_owner() {
    let ctx = TestContext::new();
    let owner = ctx.mentee("Indah Permata", "indah@example.com").await;
    let stranger = ctx.mentee("Joko Susilo", "joko@example.com").await;
    let mut ids = Vec::new();
    for title in ["First", "Second"] {
        let stored = ctx
            .services
            .notifications
            .notify(NewNotification::new(
                owner.id,
                NotificationKind::NewMessage,
                title,
                "Halo",
            ))
            .await
            .unwrap();
        ids.push(stored.id.to_hex());
    }
    let app =
        test::init_service(App::new().configure(|cfg| configure_routes(cfg, &ctx.services))).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/notifications/{}/read", ids[0]))
        .insert_header(stranger.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/notifications/{}", ids[0]))
        .insert_header(stranger.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(unread(&ctx, &owner).await, 2);

    let req = test::TestRequest::post()
        .uri(&format!("/api/notifications/{}/read", ids[0]))
        .insert_header(owner.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["is_read"], true);

    let req = test::TestRequest::get()
        .uri("/api/notifications/unread-count")
        .insert_header(owner.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["unread"], 1);

    // The stranger's read-all touches nothing of the owner's.
    let req = test::TestRequest::post()
        .uri("/api/notifications/read-all")
        .insert_header(stranger.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["updated"], 0);
    assert_eq!(unread(&ctx, &owner).await, 1);

    let req = test::TestRequest::post()
        .uri("/api/notifications/read-all")
        .insert_header(owner.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["updated"], 1);
    assert_eq!(unread(&ctx, &owner).await, 0);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/notifications/{}", ids[1]))
        .insert_header(owner.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/notifications/{}", ids[1]))
        .insert_header(owner.bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/notifications")
        .insert_header(owner.bearer())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["title"], "First");
}
