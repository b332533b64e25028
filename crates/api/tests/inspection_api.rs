//! HTTP-level integration tests for the inspection lifecycle endpoints.

mod common;

use axum::http::StatusCode;
use chrono::Datelike;
use common::{body_json, get, patch_json, post_json};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Creation and numbering
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_inspection_reserves_first_number_of_year(pool: PgPool) {
    let inspection = common::create_inspection(&pool).await;

    let year = chrono::Utc::now().year();
    assert_eq!(inspection["number"], format!("INS-{year}-0001"));
    assert_eq!(inspection["status"], "scheduled");
    assert!(inspection["overall_score"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn consecutive_creates_get_sequential_numbers(pool: PgPool) {
    let first = common::create_inspection(&pool).await;
    let second = common::create_inspection(&pool).await;

    let year = chrono::Utc::now().year();
    assert_eq!(first["number"], format!("INS-{year}-0001"));
    assert_eq!(second["number"], format!("INS-{year}-0002"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_from_template_seeds_items(pool: PgPool) {
    let template_id: i64 = sqlx::query_scalar(
        "INSERT INTO inspection_templates (name) VALUES ('Office standard') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO inspection_template_items (template_id, category, item_text, weight, sort_order) \
         VALUES ($1, 'Floors', 'Floors mopped and dry', 2.0, 0), \
                ($1, 'Restrooms', 'Restrooms stocked', 1.0, 1)",
    )
    .bind(template_id)
    .execute(&pool)
    .await
    .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/inspections",
        serde_json::json!({
            "facility_id": 1,
            "account_id": 1,
            "inspector_id": 10,
            "scheduled_date": "2026-03-02T09:00:00Z",
            "template_id": template_id,
            "created_by": 2
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let detail = body_json(get(app, &format!("/api/v1/inspections/{id}")).await).await;
    let items = detail["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["category"], "Floors");
    assert_eq!(items[1]["category"], "Restrooms");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_unknown_template_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/inspections",
        serde_json::json!({
            "facility_id": 1,
            "account_id": 1,
            "inspector_id": 10,
            "scheduled_date": "2026-03-02T09:00:00Z",
            "template_id": 999999,
            "created_by": 2
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_nonexistent_inspection_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/inspections/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// State machine transitions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn start_moves_scheduled_to_in_progress(pool: PgPool) {
    let inspection = common::create_inspection(&pool).await;
    let id = inspection["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/inspections/{id}/start"),
        serde_json::json!({"actor_id": 10}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "in_progress");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn start_twice_is_rejected(pool: PgPool) {
    let inspection = common::create_inspection(&pool).await;
    let id = inspection["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        &format!("/api/v1/inspections/{id}/start"),
        serde_json::json!({"actor_id": 10}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/inspections/{id}/start"),
        serde_json::json!({"actor_id": 10}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancel_records_reason_in_activity(pool: PgPool) {
    let inspection = common::create_inspection(&pool).await;
    let id = inspection["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/inspections/{id}/cancel"),
        serde_json::json!({"actor_id": 10, "reason": "Site closed"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "canceled");

    let app = common::build_test_app(pool);
    let activities =
        body_json(get(app, &format!("/api/v1/inspections/{id}/activities")).await).await;
    let canceled = activities["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["action"] == "canceled")
        .expect("canceled activity must be recorded");
    assert_eq!(canceled["details"]["reason"], "Site closed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn canceled_inspection_cannot_complete(pool: PgPool) {
    let inspection = common::create_inspection(&pool).await;
    let id = inspection["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        &format!("/api/v1/inspections/{id}/cancel"),
        serde_json::json!({"actor_id": 10}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/inspections/{id}/complete"),
        serde_json::json!({"summary": "too late", "actor_id": 10}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn completed_inspection_rejects_metadata_update(pool: PgPool) {
    let inspection = common::create_inspection(&pool).await;
    let id = inspection["id"].as_i64().unwrap();
    common::complete_inspection(&pool, id, &[]).await;

    let app = common::build_test_app(pool);
    let response = patch_json(
        app,
        &format!("/api/v1/inspections/{id}"),
        serde_json::json!({"notes": "after the fact", "actor_id": 10}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Completion, scoring, and derived corrective actions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn complete_without_items_scores_perfect(pool: PgPool) {
    let inspection = common::create_inspection(&pool).await;
    let id = inspection["id"].as_i64().unwrap();

    let completed = common::complete_inspection(&pool, id, &[]).await;
    assert_eq!(completed["status"], "completed");
    assert_eq!(completed["overall_score"], 100.0);
    assert_eq!(completed["rating"], "excellent");
    assert!(completed["completed_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn complete_scores_and_derives_actions_for_failures(pool: PgPool) {
    let inspection = common::create_inspection(&pool).await;
    let id = inspection["id"].as_i64().unwrap();

    let floors = common::add_item(&pool, id, "Floors", "Floors mopped").await;
    let windows = common::add_item(&pool, id, "Windows", "Windows streak-free").await;

    let completed = common::complete_inspection(
        &pool,
        id,
        &[
            (floors["id"].as_i64().unwrap(), "pass", "spotless"),
            (windows["id"].as_i64().unwrap(), "fail", "smudges on lobby glass"),
        ],
    )
    .await;

    // One pass, one fail at equal weight.
    assert_eq!(completed["overall_score"], 50.0);
    assert_eq!(completed["rating"], "poor");

    let app = common::build_test_app(pool);
    let actions = body_json(
        get(app, &format!("/api/v1/inspections/{id}/corrective-actions")).await,
    )
    .await;
    let actions = actions["data"].as_array().unwrap();
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0]["title"], "Correct: Windows streak-free");
    assert_eq!(actions[0]["description"], "smudges on lobby glass");
    assert_eq!(actions[0]["severity"], "major");
    assert_eq!(actions[0]["status"], "open");
    assert_eq!(actions[0]["item_id"], windows["id"]);
    assert_eq!(actions[0]["assignee_id"], 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn complete_requires_note_on_every_item(pool: PgPool) {
    let inspection = common::create_inspection(&pool).await;
    let id = inspection["id"].as_i64().unwrap();
    let item = common::add_item(&pool, id, "Floors", "Floors mopped").await;

    let app = common::build_test_app(pool.clone());
    post_json(
        app,
        &format!("/api/v1/inspections/{id}/start"),
        serde_json::json!({"actor_id": 10}),
    )
    .await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/inspections/{id}/complete"),
        serde_json::json!({
            "summary": "done",
            "items": [{"item_id": item["id"], "score": "pass"}],
            "actor_id": 10
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Floors"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn complete_rejects_foreign_item_id(pool: PgPool) {
    let inspection = common::create_inspection(&pool).await;
    let other = common::create_inspection(&pool).await;
    let id = inspection["id"].as_i64().unwrap();
    let foreign_item =
        common::add_item(&pool, other["id"].as_i64().unwrap(), "Floors", "Mop").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        &format!("/api/v1/inspections/{id}/complete"),
        serde_json::json!({
            "summary": "done",
            "items": [{"item_id": foreign_item["id"], "score": "pass", "notes": "n"}],
            "actor_id": 10
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn na_items_are_excluded_from_scoring(pool: PgPool) {
    let inspection = common::create_inspection(&pool).await;
    let id = inspection["id"].as_i64().unwrap();
    let a = common::add_item(&pool, id, "Floors", "Mop").await;
    let b = common::add_item(&pool, id, "Exterior", "Windows").await;

    let completed = common::complete_inspection(
        &pool,
        id,
        &[
            (a["id"].as_i64().unwrap(), "pass", "fine"),
            (b["id"].as_i64().unwrap(), "na", "building wing closed"),
        ],
    )
    .await;

    assert_eq!(completed["overall_score"], 100.0);
    assert_eq!(completed["rating"], "excellent");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn auto_create_false_skips_derived_actions(pool: PgPool) {
    let inspection = common::create_inspection(&pool).await;
    let id = inspection["id"].as_i64().unwrap();
    let item = common::add_item(&pool, id, "Floors", "Mop").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        &format!("/api/v1/inspections/{id}/complete"),
        serde_json::json!({
            "summary": "done",
            "items": [{"item_id": item["id"], "score": "fail", "notes": "dirty"}],
            "actor_id": 10,
            "auto_create_corrective_actions": false
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let actions = body_json(
        get(app, &format!("/api/v1/inspections/{id}/corrective-actions")).await,
    )
    .await;
    assert!(actions["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Activity trail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn lifecycle_is_recorded_in_order(pool: PgPool) {
    let inspection = common::create_inspection(&pool).await;
    let id = inspection["id"].as_i64().unwrap();
    let item = common::add_item(&pool, id, "Floors", "Mop").await;
    common::complete_inspection(
        &pool,
        id,
        &[(item["id"].as_i64().unwrap(), "pass", "fine")],
    )
    .await;

    let app = common::build_test_app(pool);
    let activities =
        body_json(get(app, &format!("/api/v1/inspections/{id}/activities")).await).await;
    let actions: Vec<&str> = activities["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["created", "item_added", "started", "completed"]);
}
