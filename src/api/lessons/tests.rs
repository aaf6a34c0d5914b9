use axum::http::{Method, StatusCode};
use serde_json::json;
use time::macros::datetime;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support;

#[tokio::test]
async fn lesson_detail_embeds_only_own_score() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "lesteacher01", UserRole::Teacher, "t-pass")
            .await;
    let graded =
        test_support::insert_user(ctx.state.db(), "lesstudent01", UserRole::Student, "s-pass")
            .await;
    let ungraded =
        test_support::insert_user(ctx.state.db(), "lesstudent02", UserRole::Student, "s-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "les-7A", &teacher.id).await;
    test_support::enroll_student(ctx.state.db(), &class.id, &graded.id).await;
    test_support::enroll_student(ctx.state.db(), &class.id, &ungraded.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Reading").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Chapter 1").await;
    test_support::insert_mark(ctx.state.db(), &graded.id, &lesson.id, Some(85)).await;

    let token = test_support::bearer_token(&graded.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/lessons/{}", lesson.id),
            Some(&token),
            None,
        ))
        .await
        .expect("lesson detail");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["student_mark"], 85);

    let token = test_support::bearer_token(&ungraded.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/lessons/{}", lesson.id),
            Some(&token),
            None,
        ))
        .await
        .expect("lesson detail");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert!(body["student_mark"].is_null());
}

#[tokio::test]
async fn lesson_times_render_as_local_wallclock() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "lesteacher02", UserRole::Teacher, "t-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "les-7B", &teacher.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Writing").await;
    let lesson = test_support::insert_lesson_with_times(
        ctx.state.db(),
        &module.id,
        "Essays",
        Some(datetime!(2025-09-01 08:30:00)),
        None,
    )
    .await;
    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/lessons/{}", lesson.id),
            Some(&token),
            None,
        ))
        .await
        .expect("lesson detail");

    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["start_time"], "2025-09-01T08:30:00+06:00");
    assert!(body["end_time"].is_null());
}

#[tokio::test]
async fn roster_is_visible_to_class_teacher_only() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "lesteacher03", UserRole::Teacher, "t-pass")
            .await;
    let other =
        test_support::insert_user(ctx.state.db(), "lesteacher04", UserRole::Teacher, "t-pass")
            .await;
    let student =
        test_support::insert_user(ctx.state.db(), "lesstudent03", UserRole::Student, "s-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "les-8A", &teacher.id).await;
    test_support::enroll_student(ctx.state.db(), &class.id, &student.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Grammar").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Verbs").await;
    let mark = test_support::insert_mark(ctx.state.db(), &student.id, &lesson.id, Some(64)).await;

    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/lessons/{}/students", lesson.id),
            Some(&token),
            None,
        ))
        .await
        .expect("roster");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    let roster = body.as_array().expect("array");
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0]["id"], student.id.as_str());
    assert_eq!(roster[0]["mark"], 64);
    assert_eq!(roster[0]["mark_id"], mark.id.as_str());
    assert!(roster[0]["answer_url"].is_null());

    for viewer in [&other.id, &student.id] {
        let token = test_support::bearer_token(viewer, ctx.state.settings());
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                &format!("/api/v1/lessons/{}/students", lesson.id),
                Some(&token),
                None,
            ))
            .await
            .expect("roster");
        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::read_json(response).await;
        assert_eq!(body.as_array().expect("array").len(), 0);
    }
}

#[tokio::test]
async fn teacher_creates_lesson_with_naive_times() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "lesteacher05", UserRole::Teacher, "t-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "les-9A", &teacher.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Algebra").await;
    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/lessons",
            Some(&token),
            Some(json!({
                "title": "Linear equations",
                "module_id": module.id,
                "start_time": "2025-09-02T10:00:00",
                "end_time": "2025-09-02T10:45:00"
            })),
        ))
        .await
        .expect("create lesson");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["start_time"], "2025-09-02T10:00:00+06:00");
    assert_eq!(created["end_time"], "2025-09-02T10:45:00+06:00");
}

#[tokio::test]
async fn lesson_creation_is_denied_outside_own_class() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "lesteacher06", UserRole::Teacher, "t-pass")
            .await;
    let other =
        test_support::insert_user(ctx.state.db(), "lesteacher07", UserRole::Teacher, "t-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "les-9B", &other.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Drama").await;
    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/lessons",
            Some(&token),
            Some(json!({"title": "Stolen lesson", "module_id": module.id})),
        ))
        .await
        .expect("create lesson");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
