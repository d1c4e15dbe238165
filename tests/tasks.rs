mod common;

use actix_web::http::StatusCode;
use actix_web::{rt, test, HttpServer};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use taskhub::build_app;
use taskhub::models::{DeletedTask, Task, TaskStatus};

use common::{bearer, register_user, test_state};

#[actix_rt::test]
async fn test_create_task_unauthorized() {
    let (state, _) = test_state();
    let server = HttpServer::new(move || build_app(state.clone()))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("Failed to bind random port");
    let port = server.addrs()[0].port();
    let server = server.run();
    let handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/api/tasks", port))
        .json(&json!({ "title": "Unauthorized Task" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("JSON error body");
    assert_eq!(body["error"], "Not authorized, no token");

    handle.stop(true).await;
}

#[actix_rt::test]
async fn test_task_crud_flow() {
    let (state, _) = test_state();
    let app = test::init_service(build_app(state)).await;
    let user = register_user(&app, "Crud User", "crud@example.com", "pw1").await;

    // 1. Create
    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&user.token))
        .set_json(json!({ "title": "T", "description": "D" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Task = test::read_body_json(resp).await;
    assert_eq!(created.title, "T");
    assert_eq!(created.description.as_deref(), Some("D"));
    assert_eq!(created.status, TaskStatus::Pending);
    assert_eq!(created.owner_id, user.id);

    // 2. List contains exactly that task
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(bearer(&user.token))
        .to_request();
    let tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tasks, vec![created.clone()]);

    // 3. Mark completed with a status-only patch
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(bearer(&user.token))
        .set_json(json!({ "status": "completed" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Task = test::read_body_json(resp).await;
    assert_eq!(updated.status, TaskStatus::Completed);

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(bearer(&user.token))
        .to_request();
    let tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status, TaskStatus::Completed);
    assert_eq!(tasks[0].title, "T");
    assert_eq!(tasks[0].description.as_deref(), Some("D"));
    assert_eq!(tasks[0].owner_id, user.id);

    // 4. Fetch by id
    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(bearer(&user.token))
        .to_request();
    let fetched: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, updated);

    // 5. Delete echoes the id
    let req = test::TestRequest::delete()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(bearer(&user.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: DeletedTask = test::read_body_json(resp).await;
    assert_eq!(deleted.id, created.id);

    let req = test::TestRequest::get()
        .uri(&format!("/api/tasks/{}", created.id))
        .insert_header(bearer(&user.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_create_task_requires_title() {
    let (state, _) = test_state();
    let app = test::init_service(build_app(state)).await;
    let user = register_user(&app, "Alice", "a@x.com", "pw1").await;

    for payload in [
        json!({ "description": "no title" }),
        json!({ "title": "" }),
        json!({ "title": "   " }),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .insert_header(bearer(&user.token))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Please add a title");
    }
}

#[actix_rt::test]
async fn test_update_rejects_invalid_patch() {
    let (state, _) = test_state();
    let app = test::init_service(build_app(state)).await;
    let user = register_user(&app, "Alice", "a@x.com", "pw1").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&user.token))
        .set_json(json!({ "title": "T" }))
        .to_request();
    let task: Task = test::call_and_read_body_json(&app, req).await;

    for payload in [json!({ "status": "done" }), json!({ "title": "" })] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/tasks/{}", task.id))
            .insert_header(bearer(&user.token))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    // Owner in the payload is ignored.
    let req = test::TestRequest::put()
        .uri(&format!("/api/tasks/{}", task.id))
        .insert_header(bearer(&user.token))
        .set_json(json!({ "owner_id": Uuid::new_v4(), "title": "Renamed" }))
        .to_request();
    let renamed: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(renamed.title, "Renamed");
    assert_eq!(renamed.owner_id, user.id);
}

#[actix_rt::test]
async fn test_task_ownership_and_authorization() {
    let (state, _) = test_state();
    let app = test::init_service(build_app(state)).await;
    let user_a = register_user(&app, "Owner A", "owner_a@example.com", "pwA").await;
    let user_b = register_user(&app, "Other B", "other_b@example.com", "pwB").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&user_a.token))
        .set_json(json!({ "title": "User A's Task" }))
        .to_request();
    let task_a: Task = test::call_and_read_body_json(&app, req).await;

    // User B does not see A's task in their list.
    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(bearer(&user_b.token))
        .to_request();
    let tasks_for_b: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    assert!(tasks_for_b.is_empty());

    // Every single-task operation by B is refused, whatever the payload.
    let uri = format!("/api/tasks/{}", task_a.id);
    let attempts = vec![
        test::TestRequest::get().uri(&uri),
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "title": "Attempted Update by B" })),
        test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "status": "completed" })),
        test::TestRequest::put().uri(&uri).set_json(json!({})),
        test::TestRequest::delete().uri(&uri),
    ];
    for attempt in attempts {
        let req = attempt.insert_header(bearer(&user_b.token)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "User not authorized");
    }

    // A's task is untouched.
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header(bearer(&user_a.token))
        .to_request();
    let still_a: Task = test::call_and_read_body_json(&app, req).await;
    assert_eq!(still_a, task_a);
}

#[actix_rt::test]
async fn test_invalid_patch_does_not_mask_ownership_or_missing_ids() {
    let (state, _) = test_state();
    let app = test::init_service(build_app(state)).await;
    let alice = register_user(&app, "Alice", "a@x.com", "pw1").await;
    let bob = register_user(&app, "Bob", "b@x.com", "pw2").await;

    let req = test::TestRequest::post()
        .uri("/api/tasks")
        .insert_header(bearer(&alice.token))
        .set_json(json!({ "title": "Alice's task" }))
        .to_request();
    let task: Task = test::call_and_read_body_json(&app, req).await;

    for payload in [json!({ "title": "" }), json!({ "status": "done" })] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/tasks/{}", task.id))
            .insert_header(bearer(&bob.token))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "non-owner {}", payload);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "User not authorized");

        let req = test::TestRequest::put()
            .uri(&format!("/api/tasks/{}", Uuid::new_v4()))
            .insert_header(bearer(&alice.token))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "unknown id {}", payload);
    }
}

#[actix_rt::test]
async fn test_unknown_task_ids_are_not_found() {
    let (state, _) = test_state();
    let app = test::init_service(build_app(state)).await;
    let user = register_user(&app, "Alice", "a@x.com", "pw1").await;

    for uri in [
        format!("/api/tasks/{}", Uuid::new_v4()),
        "/api/tasks/not-a-uuid".to_string(),
    ] {
        let put = test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&user.token))
            .set_json(json!({ "status": "completed" }))
            .to_request();
        assert_eq!(
            test::call_service(&app, put).await.status(),
            StatusCode::NOT_FOUND,
            "PUT {}",
            uri
        );

        let delete = test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&user.token))
            .to_request();
        assert_eq!(
            test::call_service(&app, delete).await.status(),
            StatusCode::NOT_FOUND,
            "DELETE {}",
            uri
        );
    }
}

#[actix_rt::test]
async fn test_list_preserves_creation_order() {
    let (state, _) = test_state();
    let app = test::init_service(build_app(state)).await;
    let user = register_user(&app, "Alice", "a@x.com", "pw1").await;

    for title in ["first", "second", "third"] {
        let req = test::TestRequest::post()
            .uri("/api/tasks")
            .insert_header(bearer(&user.token))
            .set_json(json!({ "title": title }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/tasks")
        .insert_header(bearer(&user.token))
        .to_request();
    let tasks: Vec<Task> = test::call_and_read_body_json(&app, req).await;
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}
