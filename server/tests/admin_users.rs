// tests/admin_users.rs

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::*;
use reino_server::db::{GameStore, Role};
use reino_server::kingdom::{Kingdom, TroopType};
use serde_json::{json, Value};

fn names(page: &Value) -> Vec<String> {
    page["usuarios"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["display_name"].as_str().unwrap().to_owned())
        .collect()
}

#[actix_web::test]
async fn dashboard_counters() {
    let kit = TestKit::new();
    let admin = kit.admin().await; // fuego
    kit.player("1", Some(Kingdom::Fuego)).await;
    kit.player("2", Some(Kingdom::Agua)).await;
    kit.player("3", None).await;
    kit.store.add_troops("1", TroopType::Soldados, 30);
    kit.store.add_troops("2", TroopType::Krakens, 4);
    kit.store.add_troops("2", TroopType::Arqueros, 6);
    let app = test::init_service(kit.app()).await;

    for (uri, expected) in [
        ("/api/usuarios-count", 4),
        ("/api/reinos-count", 2),
        ("/api/legiones-count", 40),
    ] {
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(uri)
                .cookie(admin.clone())
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        assert_eq!(json_body(resp).await, json!({ "count": expected }), "{uri}");
    }
}

#[actix_web::test]
async fn user_listing_pages_through_everyone() {
    let kit = TestKit::new();
    let admin = kit.admin().await;
    for i in 0..20 {
        kit.user(&format!("{}", 100 + i), &format!("user{i:02}"), Role::User, None);
    }
    let app = test::init_service(kit.app()).await;

    let fetch = |uri: &'static str| test::TestRequest::get().uri(uri).cookie(admin.clone());

    // 21 users with the admin: 10 + 10 + 1.
    let page1 = json_body(test::call_service(&app, fetch("/api/usuarios").to_request()).await).await;
    assert_eq!(page1["pagina"], 1);
    assert_eq!(page1["total"], 21);
    assert_eq!(page1["total_paginas"], 3);
    assert_eq!(names(&page1)[0], "Admin");
    assert_eq!(names(&page1).len(), 10);

    let page3 =
        json_body(test::call_service(&app, fetch("/api/usuarios?pagina=3").to_request()).await)
            .await;
    assert_eq!(names(&page3), vec!["user19"]);

    let past_end =
        json_body(test::call_service(&app, fetch("/api/usuarios?pagina=9").to_request()).await)
            .await;
    assert_eq!(past_end["pagina"], 9);
    assert_eq!(past_end["total"], 21);
    assert!(names(&past_end).is_empty());

    let clamped =
        json_body(test::call_service(&app, fetch("/api/usuarios?pagina=0").to_request()).await)
            .await;
    assert_eq!(clamped["pagina"], 1);
}

#[actix_web::test]
async fn full_last_page_when_total_is_a_multiple_of_the_page_size() {
    let kit = TestKit::new();
    let admin = kit.admin().await;
    for i in 0..19 {
        kit.user(&format!("{}", 100 + i), &format!("user{i:02}"), Role::User, None);
    }
    let app = test::init_service(kit.app()).await;

    let fetch = |uri: &'static str| {
        test::TestRequest::get()
            .uri(uri)
            .cookie(admin.clone())
            .to_request()
    };

    // 20 users with the admin: exactly two full pages.
    let page2 = json_body(test::call_service(&app, fetch("/api/usuarios?pagina=2")).await).await;
    assert_eq!(page2["total"], 20);
    assert_eq!(page2["total_paginas"], 2);
    assert_eq!(names(&page2).len(), 10);
    assert_eq!(names(&page2).last().map(String::as_str), Some("user18"));

    let page3 = json_body(test::call_service(&app, fetch("/api/usuarios?pagina=3")).await).await;
    assert!(names(&page3).is_empty());
}

#[actix_web::test]
async fn search_matches_name_fragment_or_exact_id() {
    let kit = TestKit::new();
    let admin = kit.admin().await;
    kit.user("111", "DragonSlayer", Role::User, None);
    kit.user("222", "dragonfly", Role::User, None);
    kit.user("333", "Kraken", Role::User, None);
    kit.user("444", "50%_off", Role::User, None);
    let app = test::init_service(kit.app()).await;

    let search = |q: &str| {
        test::TestRequest::get()
            .uri(&format!("/api/usuarios?busqueda={q}"))
            .cookie(admin.clone())
            .to_request()
    };

    let page = json_body(test::call_service(&app, search("DRAGON")).await).await;
    assert_eq!(names(&page), vec!["DragonSlayer", "dragonfly"]);
    assert_eq!(page["total"], 2);
    assert_eq!(page["total_paginas"], 1);

    let page = json_body(test::call_service(&app, search("333")).await).await;
    assert_eq!(names(&page), vec!["Kraken"]);

    // A partial id is not an id match.
    let page = json_body(test::call_service(&app, search("33")).await).await;
    assert_eq!(page["total"], 0);
    assert_eq!(page["total_paginas"], 0);

    let page = json_body(test::call_service(&app, search("50%25_")).await).await;
    assert_eq!(names(&page), vec!["50%_off"]);
}

#[actix_web::test]
async fn admin_edits_and_clears_a_users_kingdom() {
    let kit = TestKit::new();
    let admin = kit.admin().await;
    kit.player("7", Some(Kingdom::Fuego)).await;
    let app = test::init_service(kit.app()).await;

    let put = |body: Value| {
        test::TestRequest::put()
            .uri("/api/usuarios/7")
            .cookie(admin.clone())
            .set_json(body)
            .to_request()
    };

    let resp = test::call_service(&app, put(json!({ "reino": "viento" }))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!({ "success": true }));
    let user = kit.store.find_user("7").await.unwrap().unwrap();
    assert_eq!(user.kingdom, Some(Kingdom::Viento));

    let resp = test::call_service(&app, put(json!({ "reino": "mordor" }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(&app, put(json!({ "reino": null }))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let user = kit.store.find_user("7").await.unwrap().unwrap();
    assert_eq!(user.kingdom, None);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/usuarios/nobody")
            .cookie(admin.clone())
            .set_json(json!({ "reino": "agua" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn edit_without_a_kingdom_field_changes_nothing() {
    let kit = TestKit::new();
    let admin = kit.admin().await;
    kit.player("7", Some(Kingdom::Fuego)).await;
    let app = test::init_service(kit.app()).await;

    for body in [json!({}), json!({ "rey": "agua" })] {
        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/usuarios/7")
                .cookie(admin.clone())
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json_body(resp).await["success"], false);
    }
    let user = kit.store.find_user("7").await.unwrap().unwrap();
    assert_eq!(user.kingdom, Some(Kingdom::Fuego));
}

#[actix_web::test]
async fn malformed_edit_body_answers_json() {
    let kit = TestKit::new();
    let admin = kit.admin().await;
    kit.player("7", Some(Kingdom::Fuego)).await;
    let app = test::init_service(kit.app()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/usuarios/7")
            .cookie(admin)
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"reino\": ")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn deleting_a_user_removes_their_legion() {
    let kit = TestKit::new();
    let admin = kit.admin().await;
    kit.player("7", Some(Kingdom::Agua)).await;
    kit.store.add_troops("7", TroopType::Krakens, 3);
    let app = test::init_service(kit.app()).await;

    let delete = || {
        test::TestRequest::delete()
            .uri("/api/usuarios/7")
            .cookie(admin.clone())
            .to_request()
    };

    let resp = test::call_service(&app, delete()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(kit.store.find_user("7").await.unwrap().is_none());
    assert!(kit.store.legion("7").await.unwrap().is_empty());
    assert_eq!(kit.store.count_legion_units().await.unwrap(), 0);

    let resp = test::call_service(&app, delete()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
