use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::repositories;
use crate::test_support::{self, MultipartField};

#[tokio::test]
async fn class_teacher_creates_mark_once() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "mrkteacher01", UserRole::Teacher, "t-pass")
            .await;
    let student =
        test_support::insert_user(ctx.state.db(), "mrkstudent01", UserRole::Student, "s-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "mrk-7A", &teacher.id).await;
    test_support::enroll_student(ctx.state.db(), &class.id, &student.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Spelling").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Dictation").await;
    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/marks",
            Some(&token),
            Some(json!({"student_id": student.id, "lesson_id": lesson.id, "score": 70})),
        ))
        .await
        .expect("create mark");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["score"], 70);
    assert_eq!(created["student_id"], student.id.as_str());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/marks",
            Some(&token),
            Some(json!({"student_id": student.id, "lesson_id": lesson.id})),
        ))
        .await
        .expect("create mark again");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn foreign_teacher_cannot_create_marks() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "mrkteacher02", UserRole::Teacher, "t-pass")
            .await;
    let outsider =
        test_support::insert_user(ctx.state.db(), "mrkteacher03", UserRole::Teacher, "t-pass")
            .await;
    let student =
        test_support::insert_user(ctx.state.db(), "mrkstudent02", UserRole::Student, "s-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "mrk-7B", &teacher.id).await;
    test_support::enroll_student(ctx.state.db(), &class.id, &student.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Poetry").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Rhymes").await;
    let token = test_support::bearer_token(&outsider.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/marks",
            Some(&token),
            Some(json!({"student_id": student.id, "lesson_id": lesson.id})),
        ))
        .await
        .expect("create mark");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn mark_list_requires_a_lesson_filter() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "mrkteacher04", UserRole::Teacher, "t-pass")
            .await;
    let student =
        test_support::insert_user(ctx.state.db(), "mrkstudent03", UserRole::Student, "s-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "mrk-8A", &teacher.id).await;
    test_support::enroll_student(ctx.state.db(), &class.id, &student.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Botany").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Leaves").await;
    test_support::insert_mark(ctx.state.db(), &student.id, &lesson.id, Some(58)).await;
    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());

    for uri in ["/api/v1/marks", "/api/v1/marks?lesson="] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, uri, Some(&token), None))
            .await
            .expect("list marks");

        assert_eq!(response.status(), StatusCode::OK);
        let body = test_support::read_json(response).await;
        assert_eq!(body.as_array().expect("array").len(), 0);
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/marks?lesson={}", lesson.id),
            Some(&token),
            None,
        ))
        .await
        .expect("list marks");

    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    let marks = body.as_array().expect("array");
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0]["score"], 58);
    assert_eq!(marks[0]["student"]["username"], "mrkstudent03");
}

#[tokio::test]
async fn teacher_scores_a_mark_via_multipart() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "mrkteacher05", UserRole::Teacher, "t-pass")
            .await;
    let student =
        test_support::insert_user(ctx.state.db(), "mrkstudent04", UserRole::Student, "s-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "mrk-8B", &teacher.id).await;
    test_support::enroll_student(ctx.state.db(), &class.id, &student.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Zoology").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Mammals").await;
    let mark = test_support::insert_mark(ctx.state.db(), &student.id, &lesson.id, None).await;
    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::multipart_request(
            Method::PATCH,
            &format!("/api/v1/marks/{}", mark.id),
            Some(&token),
            vec![MultipartField::Text { name: "score", value: "85".to_string() }],
        ))
        .await
        .expect("score mark");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["score"], 85);

    // The graded student sees the score embedded in the lesson detail.
    let token = test_support::bearer_token(&student.id, ctx.state.settings());
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
    let body = test_support::read_json(response).await;
    assert_eq!(body["student_mark"], 85);
}

#[tokio::test]
async fn out_of_range_score_leaves_the_mark_unchanged() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "mrkteacher06", UserRole::Teacher, "t-pass")
            .await;
    let student =
        test_support::insert_user(ctx.state.db(), "mrkstudent05", UserRole::Student, "s-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "mrk-9A", &teacher.id).await;
    test_support::enroll_student(ctx.state.db(), &class.id, &student.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Geography").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Rivers").await;
    let mark = test_support::insert_mark(ctx.state.db(), &student.id, &lesson.id, Some(40)).await;
    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());

    for value in ["101", "-1", "not-a-number"] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::multipart_request(
                Method::PATCH,
                &format!("/api/v1/marks/{}", mark.id),
                Some(&token),
                vec![MultipartField::Text { name: "score", value: value.to_string() }],
            ))
            .await
            .expect("score mark");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "value: {value}");
    }

    let stored = repositories::marks::find_by_id(ctx.state.db(), &mark.id)
        .await
        .expect("find mark")
        .expect("mark exists");
    assert_eq!(stored.score, Some(40));
}

#[tokio::test]
async fn student_cannot_score_own_mark() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "mrkteacher07", UserRole::Teacher, "t-pass")
            .await;
    let student =
        test_support::insert_user(ctx.state.db(), "mrkstudent06", UserRole::Student, "s-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "mrk-9B", &teacher.id).await;
    test_support::enroll_student(ctx.state.db(), &class.id, &student.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Civics").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Elections").await;
    let mark = test_support::insert_mark(ctx.state.db(), &student.id, &lesson.id, None).await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::multipart_request(
            Method::PATCH,
            &format!("/api/v1/marks/{}", mark.id),
            Some(&token),
            vec![MultipartField::Text { name: "score", value: "100".to_string() }],
        ))
        .await
        .expect("score mark");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn student_cannot_touch_a_foreign_mark() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "mrkteacher08", UserRole::Teacher, "t-pass")
            .await;
    let owner =
        test_support::insert_user(ctx.state.db(), "mrkstudent07", UserRole::Student, "s-pass")
            .await;
    let intruder =
        test_support::insert_user(ctx.state.db(), "mrkstudent08", UserRole::Student, "s-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "mrk-10A", &teacher.id).await;
    test_support::enroll_student(ctx.state.db(), &class.id, &owner.id).await;
    test_support::enroll_student(ctx.state.db(), &class.id, &intruder.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Astronomy").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Planets").await;
    let mark = test_support::insert_mark(ctx.state.db(), &owner.id, &lesson.id, None).await;
    let token = test_support::bearer_token(&intruder.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::multipart_request(
            Method::PATCH,
            &format!("/api/v1/marks/{}", mark.id),
            Some(&token),
            vec![MultipartField::File {
                name: "answer",
                filename: "homework.pdf",
                content_type: "application/pdf",
                bytes: b"%PDF-1.4 stolen".to_vec(),
            }],
        ))
        .await
        .expect("submit answer");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn mark_mutation_takes_exactly_one_field() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "mrkteacher09", UserRole::Teacher, "t-pass")
            .await;
    let student =
        test_support::insert_user(ctx.state.db(), "mrkstudent09", UserRole::Student, "s-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "mrk-10B", &teacher.id).await;
    test_support::enroll_student(ctx.state.db(), &class.id, &student.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Painting").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Colors").await;
    let mark = test_support::insert_mark(ctx.state.db(), &student.id, &lesson.id, None).await;
    let token = test_support::bearer_token(&teacher.id, ctx.state.settings());

    let both = vec![
        MultipartField::Text { name: "score", value: "50".to_string() },
        MultipartField::File {
            name: "answer",
            filename: "essay.txt",
            content_type: "text/plain",
            bytes: b"my answer".to_vec(),
        },
    ];
    let neither: Vec<MultipartField> = Vec::new();

    for fields in [both, neither] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::multipart_request(
                Method::PATCH,
                &format!("/api/v1/marks/{}", mark.id),
                Some(&token),
                fields,
            ))
            .await
            .expect("patch mark");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn answer_upload_without_storage_is_unavailable() {
    let Some(ctx) = test_support::setup_test_context().await else { return };

    let teacher =
        test_support::insert_user(ctx.state.db(), "mrkteacher10", UserRole::Teacher, "t-pass")
            .await;
    let student =
        test_support::insert_user(ctx.state.db(), "mrkstudent10", UserRole::Student, "s-pass")
            .await;
    let class = test_support::insert_class(ctx.state.db(), "mrk-11A", &teacher.id).await;
    test_support::enroll_student(ctx.state.db(), &class.id, &student.id).await;
    let module = test_support::insert_module(ctx.state.db(), &class.id, "Crafts").await;
    let lesson = test_support::insert_lesson(ctx.state.db(), &module.id, "Origami").await;
    let mark = test_support::insert_mark(ctx.state.db(), &student.id, &lesson.id, None).await;
    let token = test_support::bearer_token(&student.id, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::multipart_request(
            Method::PATCH,
            &format!("/api/v1/marks/{}", mark.id),
            Some(&token),
            vec![MultipartField::File {
                name: "answer",
                filename: "crane.jpg",
                content_type: "image/jpeg",
                bytes: vec![0xFF, 0xD8, 0xFF],
            }],
        ))
        .await
        .expect("submit answer");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
