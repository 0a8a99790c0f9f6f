// tests/twitch_proxy.rs

mod common;

use std::sync::atomic::Ordering;

use actix_web::http::StatusCode;
use actix_web::test;
use common::*;

#[actix_web::test]
async fn live_status_needs_no_login() {
    let kit = TestKit::new();
    let app = test::init_service(kit.app()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/twitch_status?channel=dearbird")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["live"], true);
    assert_eq!(body["user_id"], "42");
    assert_eq!(body["viewer_count"], 120);
}

#[actix_web::test]
async fn status_requires_a_channel() {
    let kit = TestKit::new();
    let app = test::init_service(kit.app()).await;

    for uri in ["/api/twitch_status", "/api/twitch_status?channel=%20%20"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[actix_web::test]
async fn unknown_channel_is_a_404_not_an_empty_success() {
    let kit = TestKit::new();
    let app = test::init_service(kit.app()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/twitch_status?channel=nobody")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(resp).await["success"], false);
    assert_eq!(kit.state.counters.upstream_failures.get(), 0);
}

#[actix_web::test]
async fn upstream_outage_is_a_generic_500() {
    let kit = TestKit::new();
    kit.gateway.down.store(true, Ordering::SeqCst);
    let app = test::init_service(kit.app()).await;

    for uri in [
        "/api/twitch_status?channel=dearbird",
        "/api/twitch_clips?broadcaster_id=42",
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        let body = json_body(resp).await;
        assert_eq!(body["message"], "Error del servidor");
        assert!(!body.to_string().contains("helix unreachable"));
    }
    assert_eq!(kit.state.counters.upstream_failures.get(), 2);
}

#[actix_web::test]
async fn clips_by_id_or_channel() {
    let kit = TestKit::new();
    let app = test::init_service(kit.app()).await;

    for uri in [
        "/api/twitch_clips?broadcaster_id=42",
        "/api/twitch_clips?channel=dearbird",
        "/api/twitch_clips?broadcaster_id=42&channel=someone-else",
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let body = json_body(resp).await;
        assert_eq!(body["broadcaster_id"], "42");
        assert_eq!(body["clips"].as_array().unwrap().len(), 2);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/twitch_clips?broadcaster_id=42&first=1")
            .to_request(),
    )
    .await;
    let body = json_body(resp).await;
    assert_eq!(body["clips"].as_array().unwrap().len(), 1);
    assert_eq!(body["clips"][0]["id"], "clip1");
}

#[actix_web::test]
async fn clips_need_a_known_broadcaster() {
    let kit = TestKit::new();
    let app = test::init_service(kit.app()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/twitch_clips").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/twitch_clips?broadcaster_id=999")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
