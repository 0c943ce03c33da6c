mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_index_issues_visitor_cookie_and_welcome() {
    let app = common::create_test_app();

    let response = common::get(&app, "/", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let cookie = common::set_cookie(&response.headers, "visitor_id").expect("visitor cookie");
    let visitor_id = cookie.trim_start_matches("visitor_id=");
    assert_eq!(visitor_id.len(), 32);
    assert_eq!(response.json["visitor_id"], visitor_id);
    assert_eq!(response.json["new_visitor"], true);
    assert!(response.json["ai_tutor"]["message"].is_string());
    assert!(response.json["ai_tutor"]["emotion"].is_string());
    // CSRF disabled in the test config
    assert!(response.json.get("csrf_token").is_none());

    let raw = response
        .headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("visitor_id="))
        .unwrap()
        .to_string();
    assert!(raw.contains("HttpOnly"));
    assert!(raw.contains("Path=/"));

    // Returning visitor keeps the same id
    let again = common::get(&app, "/", Some(&cookie)).await;
    assert_eq!(again.json["visitor_id"], visitor_id);
    assert_eq!(again.json["new_visitor"], false);
}

#[tokio::test]
async fn test_start_lists_shapes() {
    let app = common::create_test_app();
    let cookie = common::new_visitor(&app).await;

    let response = common::get(&app, "/start", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);

    let shapes = response.json["shapes"].as_array().unwrap();
    assert_eq!(shapes.len(), 4);
    assert_eq!(shapes[0]["shape"], "square");
    assert_eq!(shapes[0]["formula"], "A = s²");
    assert_eq!(shapes[3]["shape"], "circle");
    assert_eq!(response.json["progress"]["total_attempts"], 0);
}

#[tokio::test]
async fn test_lesson_has_examples_and_concepts() {
    let app = common::create_test_app();
    let cookie = common::new_visitor(&app).await;

    let response = common::get(&app, "/learn/rectangle", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["shape_name"], "rectangle");
    assert_eq!(response.json["formula"]["expression"], "A = l × w");
    assert_eq!(response.json["examples"].as_array().unwrap().len(), 2);
    assert_eq!(response.json["properties"].as_array().unwrap().len(), 4);
    assert_eq!(
        response.json["learning_concepts"].as_array().unwrap().len(),
        4
    );
    assert_eq!(response.json["levels"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_practice_hides_answer() {
    let app = common::create_test_app();
    let cookie = common::new_visitor(&app).await;

    let response = common::get(&app, "/practice/square", Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::OK);

    let question = &response.json["question"];
    assert_eq!(question["shape"], "square");
    assert_eq!(question["level"], "beginner");
    assert!(question["problem"].as_str().unwrap().contains("square"));
    assert!(question.get("correct_answer").is_none());
    assert!(question.get("formula").is_none());
    assert!(question.get("steps").is_none());

    let side = question["given"]["side"].as_f64().unwrap();
    assert!((2.0..=10.0).contains(&side));
    assert_eq!(side.fract(), 0.0);

    assert_eq!(response.json["level_config"]["pass_threshold"], 0.6);
    assert_eq!(response.json["level_progress"]["required"], 5);
    assert_eq!(
        response.json["ai_tutor"]["message"],
        "Let's start with the basics. You've got this!"
    );
}

#[tokio::test]
async fn test_correct_submission_updates_progress() {
    let app = common::create_test_app();
    let cookie = common::new_visitor(&app).await;

    let response = common::answer_correctly(&app, &cookie, "triangle").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json["is_correct"], true);
    assert_eq!(response.json["is_close"], false);
    assert_eq!(response.json["outcome"], "correct");
    assert!(response.json["formula"].as_str().unwrap().starts_with("A = ½"));
    assert_eq!(response.json["steps"].as_array().unwrap().len(), 3);
    assert!(response.json["level_up"].is_null());
    assert_eq!(response.json["progress"]["total_attempts"], 1);
    assert_eq!(response.json["progress"]["total_correct"], 1);
    assert_eq!(response.json["level_status"]["attempts"], 1);
    assert_eq!(response.json["level_status"]["can_advance"], false);
}

#[tokio::test]
async fn test_wrong_and_close_submissions() {
    let app = common::create_test_app();
    let cookie = common::new_visitor(&app).await;

    let practice = common::get(&app, "/practice/rectangle", Some(&cookie)).await;
    let answer = common::expected_area(&practice.json["question"]);
    let close = common::submit(&app, &cookie, json!(answer * 1.05)).await;
    assert_eq!(close.status, StatusCode::OK);
    assert_eq!(close.json["is_correct"], false);
    assert_eq!(close.json["is_close"], true);
    assert_eq!(close.json["outcome"], "close");

    let practice = common::get(&app, "/practice/rectangle", Some(&cookie)).await;
    let answer = common::expected_area(&practice.json["question"]);
    let wrong = common::submit(&app, &cookie, json!((answer * 3.0).to_string())).await;
    assert_eq!(wrong.status, StatusCode::OK);
    assert_eq!(wrong.json["outcome"], "wrong");
    assert_eq!(wrong.json["progress"]["total_attempts"], 2);
    assert_eq!(wrong.json["progress"]["total_correct"], 0);
}

#[tokio::test]
async fn test_question_cannot_be_answered_twice() {
    let app = common::create_test_app();
    let cookie = common::new_visitor(&app).await;

    let first = common::answer_correctly(&app, &cookie, "circle").await;
    assert_eq!(first.status, StatusCode::OK);

    let second = common::submit(&app, &cookie, json!(1.0)).await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert_eq!(second.json["error"], "No active question");
}

#[tokio::test]
async fn test_submit_without_question() {
    let app = common::create_test_app();
    let cookie = common::new_visitor(&app).await;

    let response = common::submit(&app, &cookie, json!(12)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["error"], "No active question");
}

#[tokio::test]
async fn test_invalid_answers_rejected() {
    let app = common::create_test_app();
    let cookie = common::new_visitor(&app).await;
    common::get(&app, "/practice/square", Some(&cookie)).await;

    let response = common::submit(&app, &cookie, json!("abc")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["error"], "Please enter a valid number");

    let response = common::submit(&app, &cookie, json!(null)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json["error"], "Missing user_answer");

    let malformed = Request::builder()
        .method("POST")
        .uri("/api/submit-answer")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, &cookie)
        .body(Body::from("{not json"))
        .unwrap();
    let response = common::send(&app, malformed).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json["error"].is_string());

    // The pending question survives bad input
    let response = common::get(&app, "/api/progress", Some(&cookie)).await;
    assert_eq!(response.json["total_attempts"], 0);
}

#[tokio::test]
async fn test_level_up_after_five_correct() {
    let app = common::create_test_app();
    let cookie = common::new_visitor(&app).await;

    let mut level_ups = Vec::new();
    for _ in 0..5 {
        let response = common::answer_correctly(&app, &cookie, "square").await;
        assert_eq!(response.status, StatusCode::OK);
        if !response.json["level_up"].is_null() {
            level_ups.push(response.json.clone());
        }
    }

    assert_eq!(level_ups.len(), 1);
    let level_up = &level_ups[0]["level_up"];
    assert_eq!(level_up["completed_level"], "beginner");
    assert_eq!(level_up["new_level"], "intermediate");
    assert_eq!(level_up["shape_mastered"], false);

    let practice = common::get(&app, "/practice/square", Some(&cookie)).await;
    assert_eq!(practice.json["level"], "intermediate");
    assert_eq!(
        practice.json["ai_tutor"]["message"],
        "Time for a new challenge! I believe in you!"
    );

    // Sixth answer, now at intermediate, does not repeat the level-up
    let answer = common::expected_area(&practice.json["question"]);
    let response = common::submit(&app, &cookie, json!(answer)).await;
    assert!(response.json["level_up"].is_null());
}

#[tokio::test]
async fn test_unknown_shape_returns_404() {
    let app = common::create_test_app();
    let cookie = common::new_visitor(&app).await;

    for uri in [
        "/learn/hexagon",
        "/practice/hexagon",
        "/api/shape-progress/hexagon",
        "/api/shapes/hexagon",
        "/reset-shape/hexagon",
    ] {
        let response = common::get(&app, uri, Some(&cookie)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(response.json["error"], "Shape not found: hexagon");
    }
}

#[tokio::test]
async fn test_missing_visitor_returns_401() {
    let app = common::create_test_app();

    for uri in ["/start", "/practice/square", "/api/progress", "/results"] {
        let response = common::get(&app, uri, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let response = common::submit(&app, "theme=dark", json!(1)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_csrf_required_when_enabled() {
    let mut config = common::test_config();
    config.csrf_enabled = true;
    let app = common::create_test_app_with(config);

    let welcome = common::get(&app, "/", None).await;
    let visitor = common::set_cookie(&welcome.headers, "visitor_id").unwrap();
    let csrf = common::set_cookie(&welcome.headers, "csrf_token").unwrap();
    let token = welcome.json["csrf_token"].as_str().unwrap().to_string();
    assert_eq!(csrf, format!("csrf_token={}", token));

    common::get(&app, "/practice/square", Some(&visitor)).await;

    // No header: rejected before the handler runs
    let response = common::submit(&app, &format!("{}; {}", visitor, csrf), json!(4)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let request = Request::builder()
        .method("POST")
        .uri("/api/submit-answer")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, format!("{}; {}", visitor, csrf))
        .header("x-csrf-token", &token)
        .body(Body::from(json!({ "user_answer": 4 }).to_string()))
        .unwrap();
    let response = common::send(&app, request).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let app = common::create_test_app();

    let health = common::get(&app, "/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json["status"], "healthy");
    assert_eq!(
        health.json["dependencies"]["progress_store"]["backend"],
        "memory"
    );
    assert!(health.headers.contains_key("x-trace-id"));

    let unauthorized = common::get(&app, "/metrics", None).await;
    assert_eq!(unauthorized.status, StatusCode::UNAUTHORIZED);

    let credentials = general_purpose::STANDARD.encode("admin:changeme");
    let request = Request::builder()
        .uri("/metrics")
        .header(header::AUTHORIZATION, format!("Basic {}", credentials))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
