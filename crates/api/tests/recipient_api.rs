//! Integration tests for responder enrollment and the recipient state
//! machine endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    authed_get, authed_post, authed_post_empty, expect_json, seed_user, token_for,
};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn dispatch(app: axum::Router, token: &str, targets: Vec<&str>) -> Value {
    expect_json(
        authed_post(
            app,
            "/api/v1/tickets/dispatch",
            token,
            &json!({
                "ticket": {
                    "title": "Instalación eléctrica",
                    "description": "Tablero nuevo y cableado",
                    "category": "labor",
                },
                "targets": targets,
            }),
        )
        .await,
        StatusCode::OK,
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ensure_claims_row_dispatched_to_raw_email(pool: PgPool) {
    let creator = seed_user(&pool, "Marta", None, Some("marta@example.com"), None).await;
    let creator_token = token_for(&creator);

    let app = common::build_test_app(pool.clone());
    let dispatched = dispatch(app.clone(), &creator_token, vec!["pedro@example.com"]).await;
    let ticket_id = dispatched["data"]["ticket_id"].as_i64().unwrap();

    // Pedro signs up after the dispatch, then opens the ticket.
    let pedro = seed_user(
        &pool,
        "Pedro",
        None,
        Some("Pedro@Example.com"),
        Some("supplier"),
    )
    .await;
    let body = expect_json(
        authed_post_empty(
            app.clone(),
            &format!("/api/v1/tickets/{ticket_id}/recipients/ensure"),
            &token_for(&pedro),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    // The raw-email row was upgraded to his profile, not duplicated.
    assert_eq!(body["data"]["recipient_profile_id"], pedro.id);
    assert_eq!(body["data"]["identity_key"], format!("user:{}", pedro.id));
    assert!(body["data"]["recipient_email"].is_null());

    let listed = expect_json(
        authed_get(
            app,
            &format!("/api/v1/tickets/{ticket_id}/recipients"),
            &creator_token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn ensure_creates_row_for_uninvited_responder(pool: PgPool) {
    let creator = seed_user(&pool, "Marta", None, Some("marta@example.com"), None).await;
    let responder = seed_user(&pool, "Luis", None, Some("luis@example.com"), Some("supplier")).await;

    let app = common::build_test_app(pool);
    let dispatched = dispatch(app.clone(), &token_for(&creator), vec!["1144445555"]).await;
    let ticket_id = dispatched["data"]["ticket_id"].as_i64().unwrap();

    let response = authed_post_empty(
        app.clone(),
        &format!("/api/v1/tickets/{ticket_id}/recipients/ensure"),
        &token_for(&responder),
    )
    .await;
    let body = expect_json(response, StatusCode::CREATED).await;
    assert_eq!(body["data"]["status"], "sent");
    assert_eq!(body["data"]["recipient_profile_id"], responder.id);

    // A second ensure is idempotent.
    let response = authed_post_empty(
        app,
        &format!("/api/v1/tickets/{ticket_id}/recipients/ensure"),
        &token_for(&responder),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creator_cannot_enroll_as_recipient(pool: PgPool) {
    let creator = seed_user(&pool, "Marta", None, Some("marta@example.com"), None).await;
    let token = token_for(&creator);

    let app = common::build_test_app(pool);
    let dispatched = dispatch(app.clone(), &token, vec!["1144445555"]).await;
    let ticket_id = dispatched["data"]["ticket_id"].as_i64().unwrap();

    let response = authed_post_empty(
        app,
        &format!("/api/v1/tickets/{ticket_id}/recipients/ensure"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_then_offer_flow(pool: PgPool) {
    let creator = seed_user(&pool, "Marta", None, Some("marta@example.com"), None).await;
    let responder = seed_user(&pool, "Luis", None, Some("luis@example.com"), Some("supplier")).await;

    let app = common::build_test_app(pool);
    let dispatched = dispatch(app.clone(), &token_for(&creator), vec!["luis@example.com"]).await;
    let ticket_id = dispatched["data"]["ticket_id"].as_i64().unwrap();

    let token = token_for(&responder);
    let ensured = expect_json(
        authed_post_empty(
            app.clone(),
            &format!("/api/v1/tickets/{ticket_id}/recipients/ensure"),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let recipient_id = ensured["data"]["id"].as_i64().unwrap();

    let reviewed = expect_json(
        authed_post_empty(
            app.clone(),
            &format!("/api/v1/recipients/{recipient_id}/review"),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(reviewed["data"]["status"], "in_review");

    let offered = expect_json(
        authed_post(
            app.clone(),
            &format!("/api/v1/recipients/{recipient_id}/offer"),
            &token,
            &json!({"amount": 150000.5, "message": "Incluye materiales", "estimated_days": 14}),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(offered["data"]["status"], "offered");
    assert_eq!(offered["data"]["offer_amount"], 150000.5);
    assert_eq!(offered["data"]["offer_days"], 14);
    assert_eq!(offered["data"]["offer_fields_saved"], true);

    // A responder can also read the ticket itself once enrolled.
    let response = authed_get(app, &format!("/api/v1/tickets/{ticket_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn negative_offer_amount_is_rejected(pool: PgPool) {
    let creator = seed_user(&pool, "Marta", None, Some("marta@example.com"), None).await;
    let responder = seed_user(&pool, "Luis", None, Some("luis@example.com"), Some("supplier")).await;

    let app = common::build_test_app(pool);
    let dispatched = dispatch(app.clone(), &token_for(&creator), vec!["luis@example.com"]).await;
    let ticket_id = dispatched["data"]["ticket_id"].as_i64().unwrap();

    let token = token_for(&responder);
    let ensured = expect_json(
        authed_post_empty(
            app.clone(),
            &format!("/api/v1/tickets/{ticket_id}/recipients/ensure"),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let recipient_id = ensured["data"]["id"].as_i64().unwrap();

    let body = expect_json(
        authed_post(
            app.clone(),
            &format!("/api/v1/recipients/{recipient_id}/offer"),
            &token,
            &json!({"amount": -5.0}),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // The thread state is untouched by the rejected submission.
    let listed = expect_json(
        authed_get(
            app,
            &format!("/api/v1/tickets/{ticket_id}/recipients"),
            &token_for(&creator),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed["data"][0]["status"], "sent");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reject_after_offer_keeps_offer_fields(pool: PgPool) {
    let creator = seed_user(&pool, "Marta", None, Some("marta@example.com"), None).await;
    let responder = seed_user(&pool, "Luis", None, Some("luis@example.com"), Some("supplier")).await;

    let app = common::build_test_app(pool);
    let dispatched = dispatch(app.clone(), &token_for(&creator), vec!["luis@example.com"]).await;
    let ticket_id = dispatched["data"]["ticket_id"].as_i64().unwrap();

    let token = token_for(&responder);
    let ensured = expect_json(
        authed_post_empty(
            app.clone(),
            &format!("/api/v1/tickets/{ticket_id}/recipients/ensure"),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let recipient_id = ensured["data"]["id"].as_i64().unwrap();

    expect_json(
        authed_post(
            app.clone(),
            &format!("/api/v1/recipients/{recipient_id}/offer"),
            &token,
            &json!({"amount": 80000.0}),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    let rejected = expect_json(
        authed_post_empty(
            app,
            &format!("/api/v1/recipients/{recipient_id}/reject"),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(rejected["data"]["status"], "rejected");
    assert!(!rejected["data"]["rejected_at"].is_null());
    // The withdrawn context stays visible to the requester.
    assert_eq!(rejected["data"]["offer_amount"], 80000.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stranger_cannot_transition_someone_elses_thread(pool: PgPool) {
    let creator = seed_user(&pool, "Marta", None, Some("marta@example.com"), None).await;
    let responder = seed_user(&pool, "Luis", None, Some("luis@example.com"), Some("supplier")).await;
    let stranger = seed_user(&pool, "Raúl", None, Some("raul@example.com"), None).await;

    let app = common::build_test_app(pool);
    let dispatched = dispatch(app.clone(), &token_for(&creator), vec!["luis@example.com"]).await;
    let ticket_id = dispatched["data"]["ticket_id"].as_i64().unwrap();

    let ensured = expect_json(
        authed_post_empty(
            app.clone(),
            &format!("/api/v1/tickets/{ticket_id}/recipients/ensure"),
            &token_for(&responder),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    let recipient_id = ensured["data"]["id"].as_i64().unwrap();

    // Neither a third party nor the creator can act on the thread.
    for actor in [&stranger, &creator] {
        let response = authed_post_empty(
            app.clone(),
            &format!("/api/v1/recipients/{recipient_id}/review"),
            &token_for(actor),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
