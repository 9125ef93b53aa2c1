use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;

mod common;

#[actix_web::test]
#[serial]
async fn test_assignment_is_admin_only_with_pending_default() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let app = test::init_service(common::create_app(&ctx)).await;

    let employee = common::create_test_user(&ctx.pool, &common::MockData::employee()).await;
    let admin = common::create_test_user(&ctx.pool, &common::MockData::admin()).await;

    let payload = json!({
        "title": "Prepare onboarding deck",
        "description": "Slides for the new joiners session.",
        "dueDate": "2030-09-01T17:00:00",
        "assignedTo": employee.id
    });

    let employee_token = common::AuthHelper::create_test_token(&employee, &ctx.config);
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(common::AuthHelper::auth_header(&employee_token))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let admin_token = common::AuthHelper::create_test_token(&admin, &ctx.config);
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(common::AuthHelper::auth_header(&admin_token))
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["priority"], "medium");
    assert_eq!(body["data"]["assignedTo"], employee.id.to_string());
    assert_eq!(body["data"]["assignedBy"], admin.id.to_string());
}

#[actix_web::test]
#[serial]
async fn test_past_due_tasks_read_as_overdue_until_completed() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let app = test::init_service(common::create_app(&ctx)).await;

    let employee = common::create_test_user(&ctx.pool, &common::MockData::employee()).await;
    let admin = common::create_test_user(&ctx.pool, &common::MockData::admin()).await;
    let admin_token = common::AuthHelper::create_test_token(&admin, &ctx.config);

    // Creation refuses a deadline that has already passed.
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(common::AuthHelper::auth_header(&admin_token))
        .set_json(&json!({
            "title": "File the Q1 report",
            "description": "Long overdue.",
            "dueDate": "2025-01-01T09:00:00",
            "assignedTo": employee.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Bad request: Due date must be in the future");

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(common::AuthHelper::auth_header(&admin_token))
        .set_json(&json!({
            "title": "File the Q1 report",
            "description": "Quarterly filing.",
            "dueDate": "2030-09-01T17:00:00",
            "assignedTo": employee.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: serde_json::Value = test::read_body_json(resp).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    // An admin reschedule may land in the past; the stored status stays
    // pending and only the read-side view flips.
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(common::AuthHelper::auth_header(&admin_token))
        .set_json(&json!({ "dueDate": "2025-01-01T09:00:00" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "overdue");

    let employee_token = common::AuthHelper::create_test_token(&employee, &ctx.config);
    let req = test::TestRequest::get()
        .uri("/api/tasks/my-tasks")
        .insert_header(common::AuthHelper::auth_header(&employee_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["status"], "overdue");

    // Completion wins over the due date.
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(common::AuthHelper::auth_header(&employee_token))
        .set_json(&json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "completed");
}

#[actix_web::test]
#[serial]
async fn test_assignee_may_only_move_the_status() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let app = test::init_service(common::create_app(&ctx)).await;

    let employee = common::create_test_user(&ctx.pool, &common::MockData::employee()).await;
    let outsider = common::create_test_user(&ctx.pool, &common::MockData::outsider()).await;
    let admin = common::create_test_user(&ctx.pool, &common::MockData::admin()).await;
    let admin_token = common::AuthHelper::create_test_token(&admin, &ctx.config);

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(common::AuthHelper::auth_header(&admin_token))
        .set_json(&json!({
            "title": "Prepare onboarding deck",
            "description": "Slides.",
            "dueDate": "2030-09-01T17:00:00",
            "assignedTo": employee.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let created: serde_json::Value = test::read_body_json(resp).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let employee_token = common::AuthHelper::create_test_token(&employee, &ctx.config);

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(common::AuthHelper::auth_header(&employee_token))
        .set_json(&json!({ "status": "in_progress" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "in_progress");

    // Touching anything else is rejected outright.
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(common::AuthHelper::auth_header(&employee_token))
        .set_json(&json!({ "status": "completed", "title": "Renamed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(
        body["message"],
        "Forbidden: Assignees may only update the status"
    );

    // An empty update has nothing to apply.
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(common::AuthHelper::auth_header(&employee_token))
        .set_json(&json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Someone else's task is off limits entirely.
    let outsider_token = common::AuthHelper::create_test_token(&outsider, &ctx.config);
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(common::AuthHelper::auth_header(&outsider_token))
        .set_json(&json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn test_admin_reassigns_and_the_listing_filters_follow() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let app = test::init_service(common::create_app(&ctx)).await;

    let employee = common::create_test_user(&ctx.pool, &common::MockData::employee()).await;
    let colleague = common::create_test_user(&ctx.pool, &common::MockData::colleague()).await;
    let admin = common::create_test_user(&ctx.pool, &common::MockData::admin()).await;
    let admin_token = common::AuthHelper::create_test_token(&admin, &ctx.config);

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(common::AuthHelper::auth_header(&admin_token))
        .set_json(&json!({
            "title": "Prepare onboarding deck",
            "description": "Slides.",
            "dueDate": "2030-09-01T17:00:00",
            "assignedTo": employee.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let created: serde_json::Value = test::read_body_json(resp).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(common::AuthHelper::auth_header(&admin_token))
        .set_json(&json!({
            "assignedTo": colleague.id,
            "priority": "urgent"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["assignedTo"], colleague.id.to_string());
    assert_eq!(body["data"]["priority"], "urgent");

    // The task moved out of the original assignee's view.
    let employee_token = common::AuthHelper::create_test_token(&employee, &ctx.config);
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(common::AuthHelper::auth_header(&employee_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let colleague_token = common::AuthHelper::create_test_token(&colleague, &ctx.config);
    let req = test::TestRequest::get()
        .uri("/api/tasks/my-tasks")
        .insert_header(common::AuthHelper::auth_header(&colleague_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Admin board, filtered by assignee.
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks?assignedTo={}", colleague.id))
        .insert_header(common::AuthHelper::auth_header(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks?assignedTo={}", employee.id))
        .insert_header(common::AuthHelper::auth_header(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // The board itself is admin only.
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(common::AuthHelper::auth_header(&employee_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn test_comments_thread_on_a_task() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let app = test::init_service(common::create_app(&ctx)).await;

    let employee = common::create_test_user(&ctx.pool, &common::MockData::employee()).await;
    let outsider = common::create_test_user(&ctx.pool, &common::MockData::outsider()).await;
    let admin = common::create_test_user(&ctx.pool, &common::MockData::admin()).await;
    let admin_token = common::AuthHelper::create_test_token(&admin, &ctx.config);
    let employee_token = common::AuthHelper::create_test_token(&employee, &ctx.config);

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(common::AuthHelper::auth_header(&admin_token))
        .set_json(&json!({
            "title": "Prepare onboarding deck",
            "description": "Slides.",
            "dueDate": "2030-09-01T17:00:00",
            "assignedTo": employee.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let created: serde_json::Value = test::read_body_json(resp).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/tasks/{}/comments", id))
        .insert_header(common::AuthHelper::auth_header(&employee_token))
        .set_json(&json!({ "comment": "Draft is in the shared drive." }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri(&format!("/api/tasks/{}/comments", id))
        .insert_header(common::AuthHelper::auth_header(&admin_token))
        .set_json(&json!({ "comment": "Looks good, ship it." }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}/comments", id))
        .insert_header(common::AuthHelper::auth_header(&employee_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let comments = body["data"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["comment"], "Draft is in the shared drive.");
    assert_eq!(comments[0]["authorName"], employee.name);
    assert_eq!(comments[1]["authorName"], admin.name);

    // Not the assignee, not an admin: no thread access.
    let outsider_token = common::AuthHelper::create_test_token(&outsider, &ctx.config);
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}/comments", id))
        .insert_header(common::AuthHelper::auth_header(&outsider_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn test_deleting_a_task_takes_its_comments_with_it() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let app = test::init_service(common::create_app(&ctx)).await;

    let employee = common::create_test_user(&ctx.pool, &common::MockData::employee()).await;
    let admin = common::create_test_user(&ctx.pool, &common::MockData::admin()).await;
    let admin_token = common::AuthHelper::create_test_token(&admin, &ctx.config);
    let employee_token = common::AuthHelper::create_test_token(&employee, &ctx.config);

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(common::AuthHelper::auth_header(&admin_token))
        .set_json(&json!({
            "title": "Prepare onboarding deck",
            "description": "Slides.",
            "dueDate": "2030-09-01T17:00:00",
            "assignedTo": employee.id
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let created: serde_json::Value = test::read_body_json(resp).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/tasks/{}/comments", id))
        .insert_header(common::AuthHelper::auth_header(&employee_token))
        .set_json(&json!({ "comment": "On it." }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(common::AuthHelper::auth_header(&employee_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", id))
        .insert_header(common::AuthHelper::auth_header(&admin_token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Task deleted");

    common::TestAssertions::assert_record_count(&ctx.pool, "tasks", 0).await;
    common::TestAssertions::assert_record_count(&ctx.pool, "task_comments", 0).await;
}
