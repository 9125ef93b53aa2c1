use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;

mod common;

#[actix_web::test]
#[serial]
async fn test_scheduling_returns_details_with_participants() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let app = test::init_service(common::create_app(&ctx)).await;

    let organizer = common::create_test_user(&ctx.pool, &common::MockData::employee()).await;
    let attendee = common::create_test_user(&ctx.pool, &common::MockData::colleague()).await;
    let token = common::AuthHelper::create_test_token(&organizer, &ctx.config);

    let req = test::TestRequest::post()
        .uri("/api/meetings")
        .insert_header(common::AuthHelper::auth_header(&token))
        .set_json(&json!({
            "title": "Quarterly review",
            "agenda": "Walk through Q2 numbers.",
            "date": "2030-09-01",
            "time": "14:30",
            "link": "https://meet.example.com/q2-review",
            "participants": [attendee.id]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["title"], "Quarterly review");
    assert_eq!(body["data"]["date"], "2030-09-01");
    assert_eq!(body["data"]["time"], "14:30");
    assert_eq!(body["data"]["organizerId"], organizer.id.to_string());

    let participants = body["data"]["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["id"], attendee.id.to_string());
    assert_eq!(participants[0]["email"], attendee.email);
}

#[actix_web::test]
#[serial]
async fn test_scheduling_validates_time_link_and_participants() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let app = test::init_service(common::create_app(&ctx)).await;

    let organizer = common::create_test_user(&ctx.pool, &common::MockData::employee()).await;
    let attendee = common::create_test_user(&ctx.pool, &common::MockData::colleague()).await;
    let token = common::AuthHelper::create_test_token(&organizer, &ctx.config);

    let cases = [
        (
            json!({
                "title": "Bad time",
                "agenda": "x",
                "date": "2030-09-01",
                "time": "25:99",
                "link": "https://meet.example.com/x",
                "participants": [attendee.id]
            }),
            "Bad request: Meeting time must be in HH:MM format",
        ),
        (
            json!({
                "title": "Bad link",
                "agenda": "x",
                "date": "2030-09-01",
                "time": "14:30",
                "link": "meet.example.com/x",
                "participants": [attendee.id]
            }),
            "Bad request: Meeting link must be a valid http(s) URL",
        ),
        (
            json!({
                "title": "Nobody invited",
                "agenda": "x",
                "date": "2030-09-01",
                "time": "14:30",
                "link": "https://meet.example.com/x",
                "participants": []
            }),
            "Bad request: At least one participant is required",
        ),
        (
            json!({
                "title": "Long gone",
                "agenda": "x",
                "date": "2020-01-01",
                "time": "14:30",
                "link": "https://meet.example.com/x",
                "participants": [attendee.id]
            }),
            "Bad request: Meeting date cannot be in the past",
        ),
    ];

    for (payload, message) in cases {
        let req = test::TestRequest::post()
            .uri("/api/meetings")
            .insert_header(common::AuthHelper::auth_header(&token))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], message);
    }

    common::TestAssertions::assert_record_count(&ctx.pool, "meetings", 0).await;
}

#[actix_web::test]
#[serial]
async fn test_meeting_details_are_for_participants_only() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let app = test::init_service(common::create_app(&ctx)).await;

    let organizer = common::create_test_user(&ctx.pool, &common::MockData::employee()).await;
    let attendee = common::create_test_user(&ctx.pool, &common::MockData::colleague()).await;
    let admin = common::create_test_user(&ctx.pool, &common::MockData::admin()).await;
    let outsider = common::create_test_user(&ctx.pool, &common::MockData::outsider()).await;

    let organizer_token = common::AuthHelper::create_test_token(&organizer, &ctx.config);
    let req = test::TestRequest::post()
        .uri("/api/meetings")
        .insert_header(common::AuthHelper::auth_header(&organizer_token))
        .set_json(&json!({
            "title": "Quarterly review",
            "agenda": "Numbers.",
            "date": "2030-09-01",
            "time": "14:30",
            "link": "https://meet.example.com/q2",
            "participants": [attendee.id]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let created: serde_json::Value = test::read_body_json(resp).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    for user in [&organizer, &attendee, &admin] {
        let token = common::AuthHelper::create_test_token(user, &ctx.config);
        let req = test::TestRequest::get()
            .uri(&format!("/api/meetings/{}", id))
            .insert_header(common::AuthHelper::auth_header(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let outsider_token = common::AuthHelper::create_test_token(&outsider, &ctx.config);
    let req = test::TestRequest::get()
        .uri(&format!("/api/meetings/{}", id))
        .insert_header(common::AuthHelper::auth_header(&outsider_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn test_listing_scopes_to_involvement() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let app = test::init_service(common::create_app(&ctx)).await;

    let organizer = common::create_test_user(&ctx.pool, &common::MockData::employee()).await;
    let attendee = common::create_test_user(&ctx.pool, &common::MockData::colleague()).await;
    let admin = common::create_test_user(&ctx.pool, &common::MockData::admin()).await;

    let organizer_token = common::AuthHelper::create_test_token(&organizer, &ctx.config);
    let req = test::TestRequest::post()
        .uri("/api/meetings")
        .insert_header(common::AuthHelper::auth_header(&organizer_token))
        .set_json(&json!({
            "title": "One on one",
            "agenda": "Catch up.",
            "date": "2030-09-02",
            "time": "10:00",
            "link": "https://meet.example.com/1on1",
            "participants": [attendee.id]
        }))
        .to_request();
    test::call_service(&app, req).await;

    // Organizer and invitee both see it; the admin sees everything.
    for user in [&organizer, &attendee, &admin] {
        let token = common::AuthHelper::create_test_token(user, &ctx.config);
        let req = test::TestRequest::get()
            .uri("/api/meetings")
            .insert_header(common::AuthHelper::auth_header(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }
}

#[actix_web::test]
#[serial]
async fn test_only_the_organizer_or_admin_edits() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let app = test::init_service(common::create_app(&ctx)).await;

    let organizer = common::create_test_user(&ctx.pool, &common::MockData::employee()).await;
    let attendee = common::create_test_user(&ctx.pool, &common::MockData::colleague()).await;

    let organizer_token = common::AuthHelper::create_test_token(&organizer, &ctx.config);
    let req = test::TestRequest::post()
        .uri("/api/meetings")
        .insert_header(common::AuthHelper::auth_header(&organizer_token))
        .set_json(&json!({
            "title": "Quarterly review",
            "agenda": "Numbers.",
            "date": "2030-09-01",
            "time": "14:30",
            "link": "https://meet.example.com/q2",
            "participants": [attendee.id]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let created: serde_json::Value = test::read_body_json(resp).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let reschedule = json!({
        "title": "Quarterly review",
        "agenda": "Numbers.",
        "date": "2030-09-03",
        "time": "09:00",
        "link": "https://meet.example.com/q2",
        "participants": [attendee.id]
    });

    // Being invited does not grant edit rights.
    let attendee_token = common::AuthHelper::create_test_token(&attendee, &ctx.config);
    let req = test::TestRequest::put()
        .uri(&format!("/api/meetings/{}", id))
        .insert_header(common::AuthHelper::auth_header(&attendee_token))
        .set_json(&reschedule)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/api/meetings/{}", id))
        .insert_header(common::AuthHelper::auth_header(&organizer_token))
        .set_json(&reschedule)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["date"], "2030-09-03");
    assert_eq!(body["data"]["time"], "09:00");

    // The update is validated the same way as a create.
    let mut bad = reschedule.clone();
    bad["time"] = json!("9");
    let req = test::TestRequest::put()
        .uri(&format!("/api/meetings/{}", id))
        .insert_header(common::AuthHelper::auth_header(&organizer_token))
        .set_json(&bad)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
#[serial]
async fn test_cancelling_removes_the_meeting_and_roster() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let app = test::init_service(common::create_app(&ctx)).await;

    let organizer = common::create_test_user(&ctx.pool, &common::MockData::employee()).await;
    let attendee = common::create_test_user(&ctx.pool, &common::MockData::colleague()).await;
    let organizer_token = common::AuthHelper::create_test_token(&organizer, &ctx.config);

    let req = test::TestRequest::post()
        .uri("/api/meetings")
        .insert_header(common::AuthHelper::auth_header(&organizer_token))
        .set_json(&json!({
            "title": "Standup",
            "agenda": "Daily.",
            "date": "2030-09-01",
            "time": "09:15",
            "link": "https://meet.example.com/standup",
            "participants": [attendee.id]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let created: serde_json::Value = test::read_body_json(resp).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let attendee_token = common::AuthHelper::create_test_token(&attendee, &ctx.config);
    let req = test::TestRequest::delete()
        .uri(&format!("/api/meetings/{}", id))
        .insert_header(common::AuthHelper::auth_header(&attendee_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/meetings/{}", id))
        .insert_header(common::AuthHelper::auth_header(&organizer_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Meeting cancelled");

    common::TestAssertions::assert_record_count(&ctx.pool, "meetings", 0).await;
    common::TestAssertions::assert_record_count(&ctx.pool, "meeting_participants", 0).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/meetings/{}", id))
        .insert_header(common::AuthHelper::auth_header(&organizer_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
