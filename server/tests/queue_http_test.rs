//! HTTP Integration Tests for the Review Queue
//!
//! Tests operator identification, filtering and pagination over the seeded
//! records, confirmation-gated decisions and the payment round trip.
//!
//! Run with: `cargo test --test queue_http_test -- --nocapture`

mod helpers;

use axum::body::Body;
use axum::http::Method;
use helpers::{body_to_json, confirmation_token, TestApp};
use natioid_server::config::Config;
use natioid_server::operator::OPERATOR_HEADER;
use natioid_server::queue::seed::{APPROVED_IDS, PENDING_IDS, REJECTED_ID, UNDER_REVIEW_ID};
use serde_json::json;
use uuid::Uuid;

// ============================================================================
// Access Control Tests
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_operator() {
    let app = TestApp::new();

    let resp = app.send(Method::GET, "/api/admin/applications", None).await;
    assert_eq!(resp.status(), 401);
    assert_eq!(body_to_json(resp).await["error"], "operator_required");

    let req = TestApp::request(Method::GET, "/api/admin/applications")
        .header(OPERATOR_HEADER, "not-a-uuid")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await;
    assert_eq!(resp.status(), 400);
    assert_eq!(body_to_json(resp).await["error"], "invalid_operator");
}

#[tokio::test]
async fn test_operator_allowlist() {
    let allowed = Uuid::new_v4();
    let app = TestApp::with_config(Config {
        operator_allowlist: Some(vec![allowed]),
        ..Config::default_for_test()
    });

    let resp = app.send_admin(Method::GET, "/api/admin/applications", None).await;
    assert_eq!(resp.status(), 403);
    assert_eq!(body_to_json(resp).await["error"], "not_operator");

    let req = TestApp::request(Method::GET, "/api/admin/applications")
        .header(OPERATOR_HEADER, allowed.to_string())
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.oneshot(req).await.status(), 200);
}

// ============================================================================
// Listing Tests
// ============================================================================

#[tokio::test]
async fn test_pending_filter_returns_exactly_the_seeded_pending_records() {
    for page_size in [1, 2, 5, 10] {
        let app = TestApp::with_config(Config {
            queue_page_size: page_size,
            ..Config::default_for_test()
        });

        let mut seen = Vec::new();
        let mut page = 1;
        loop {
            let resp = app
                .send_admin(
                    Method::GET,
                    &format!("/api/admin/applications?status=pending&page={page}"),
                    None,
                )
                .await;
            assert_eq!(resp.status(), 200);
            let json = body_to_json(resp).await;
            assert_eq!(json["total"], 3);
            let items = json["items"].as_array().unwrap();
            if items.is_empty() {
                break;
            }
            for item in items {
                assert_eq!(item["status"], "pending");
                seen.push(item["id"].as_str().unwrap().parse::<Uuid>().unwrap());
            }
            page += 1;
        }

        seen.sort();
        let mut expected = PENDING_IDS.to_vec();
        expected.sort();
        assert_eq!(seen, expected, "page size {page_size}");
    }
}

#[tokio::test]
async fn test_list_paginates_and_combines_filters() {
    let app = TestApp::new();

    let resp = app.send_admin(Method::GET, "/api/admin/applications", None).await;
    let json = body_to_json(resp).await;
    assert_eq!(json["total"], 8);
    assert_eq!(json["page_size"], 5);
    assert_eq!(json["total_pages"], 2);
    assert_eq!(json["items"].as_array().unwrap().len(), 5);

    let resp = app
        .send_admin(Method::GET, "/api/admin/applications?page=2", None)
        .await;
    assert_eq!(body_to_json(resp).await["items"].as_array().unwrap().len(), 3);

    let resp = app
        .send_admin(
            Method::GET,
            "/api/admin/applications?status=approved&application_type=new&sort=name",
            None,
        )
        .await;
    let json = body_to_json(resp).await;
    for item in json["items"].as_array().unwrap() {
        assert_eq!(item["status"], "approved");
        assert_eq!(item["application_type"], "new");
    }

    let resp = app
        .send_admin(Method::GET, "/api/admin/applications?q=nid-2026-000007", None)
        .await;
    let json = body_to_json(resp).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["id"], REJECTED_ID.to_string());
}

#[tokio::test]
async fn test_list_far_page_is_empty() {
    let app = TestApp::new();

    let resp = app
        .send_admin(
            Method::GET,
            &format!("/api/admin/applications?page={}", usize::MAX),
            None,
        )
        .await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert!(json["items"].as_array().unwrap().is_empty());
    assert_eq!(json["total"], 8);
}

#[tokio::test]
async fn test_stats_count_by_status() {
    let app = TestApp::new();
    let resp = app
        .send_admin(Method::GET, "/api/admin/applications/stats", None)
        .await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert_eq!(json["pending"], 3);
    assert_eq!(json["approved"], 3);
    assert_eq!(json["rejected"], 1);
    assert_eq!(json["under_review"], 1);
    assert_eq!(json["total"], 8);
}

#[tokio::test]
async fn test_get_unknown_application() {
    let app = TestApp::new();
    let resp = app
        .send_admin(
            Method::GET,
            &format!("/api/admin/applications/{}", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(resp.status(), 404);
    assert_eq!(body_to_json(resp).await["error"], "APPLICATION_NOT_FOUND");
}

// ============================================================================
// Gated Decisions
// ============================================================================

#[tokio::test]
async fn test_approve_is_gated_and_decline_changes_nothing() {
    let app = TestApp::new();
    let id = PENDING_IDS[0];
    let uri = format!("/api/admin/applications/{id}/approve");

    let resp = app.send_admin(Method::POST, &uri, None).await;
    let token = confirmation_token(resp).await;
    assert_eq!(app.status_of(id).await, "pending");

    let resp = app.resolve_admin(&token, false).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(body_to_json(resp).await["outcome"], "cancelled");
    assert_eq!(app.status_of(id).await, "pending");

    let resp = app.send_admin(Method::POST, &uri, None).await;
    let token = confirmation_token(resp).await;
    let resp = app.resolve_admin(&token, true).await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert_eq!(json["outcome"], "executed");
    assert_eq!(json["result"]["status"], "approved");
    assert_eq!(app.status_of(id).await, "approved");

    let resp = app
        .send_admin(
            Method::GET,
            &format!("/api/admin/audit-log?action=application.approve&record_id={id}"),
            None,
        )
        .await;
    let json = body_to_json(resp).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["from_status"], "pending");
    assert_eq!(json["items"][0]["to_status"], "approved");
    assert_eq!(json["items"][0]["actor_id"], app.operator.to_string());
}

#[tokio::test]
async fn test_expired_confirmation_is_gone() {
    let app = TestApp::with_config(Config {
        confirmation_ttl_secs: 1,
        ..Config::default_for_test()
    });
    let id = PENDING_IDS[0];

    let resp = app
        .send_admin(Method::POST, &format!("/api/admin/applications/{id}/approve"), None)
        .await;
    let token = confirmation_token(resp).await;

    tokio::time::sleep(std::time::Duration::from_millis(1200)).await;

    let resp = app.resolve_admin(&token, true).await;
    assert_eq!(resp.status(), 410);
    assert_eq!(body_to_json(resp).await["error"], "CONFIRMATION_EXPIRED");
    assert_eq!(app.status_of(id).await, "pending");

    // Expired tokens are consumed
    let resp = app.resolve_admin(&token, true).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_reject_is_gated_and_requires_reason() {
    let app = TestApp::new();
    let id = UNDER_REVIEW_ID;
    let uri = format!("/api/admin/applications/{id}/reject");

    let resp = app
        .send_admin(Method::POST, &uri, Some(json!({ "reason": "" })))
        .await;
    assert_eq!(resp.status(), 400);

    let resp = app
        .send_admin(
            Method::POST,
            &uri,
            Some(json!({ "reason": "Photo does not meet requirements" })),
        )
        .await;
    let token = confirmation_token(resp).await;
    assert_eq!(app.status_of(id).await, "under_review");

    let resp = app.resolve_admin(&token, true).await;
    let json = body_to_json(resp).await;
    assert_eq!(json["result"]["status"], "rejected");
    assert_eq!(json["result"]["rejection_reason"], "Photo does not meet requirements");
}

#[tokio::test]
async fn test_invalid_transitions_are_refused_before_confirmation() {
    let app = TestApp::new();

    let resp = app
        .send_admin(
            Method::POST,
            &format!("/api/admin/applications/{REJECTED_ID}/approve"),
            None,
        )
        .await;
    assert_eq!(resp.status(), 409);
    assert_eq!(body_to_json(resp).await["error"], "INVALID_TRANSITION");
    assert!(app.state.confirmations.is_empty());

    let resp = app
        .send_admin(
            Method::POST,
            &format!("/api/admin/applications/{}/claim", APPROVED_IDS[0]),
            None,
        )
        .await;
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn test_request_info_twice_is_blocked() {
    let app = TestApp::new();
    let id = PENDING_IDS[1];
    let uri = format!("/api/admin/applications/{id}/request-info");

    let resp = app
        .send_admin(
            Method::POST,
            &uri,
            Some(json!({ "note": "Please upload a clearer photo" })),
        )
        .await;
    let token = confirmation_token(resp).await;
    let resp = app.resolve_admin(&token, true).await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert_eq!(json["result"]["info_request"]["note"], "Please upload a clearer photo");

    let resp = app.send_admin(Method::POST, &uri, Some(json!({}))).await;
    assert_eq!(resp.status(), 409);
    assert_eq!(body_to_json(resp).await["error"], "INFO_ALREADY_REQUESTED");

    let resp = app
        .send(Method::GET, "/api/applications/track/NID-2026-000002", None)
        .await;
    let json = body_to_json(resp).await;
    assert_eq!(json["info_requested"], "Please upload a clearer photo");
}

#[tokio::test]
async fn test_request_info_not_accepted_after_decision() {
    let app = TestApp::new();
    let resp = app
        .send_admin(
            Method::POST,
            &format!("/api/admin/applications/{}/request-info", APPROVED_IDS[1]),
            Some(json!({})),
        )
        .await;
    assert_eq!(resp.status(), 409);
    assert_eq!(body_to_json(resp).await["error"], "INFO_NOT_ACCEPTED");
}

#[tokio::test]
async fn test_tokens_belong_to_the_requesting_operator() {
    let app = TestApp::new();
    let id = PENDING_IDS[2];

    let resp = app
        .send_admin(
            Method::POST,
            &format!("/api/admin/applications/{id}/approve"),
            None,
        )
        .await;
    let token = confirmation_token(resp).await;

    let req = TestApp::request(Method::POST, &format!("/api/admin/confirmations/{token}"))
        .header(OPERATOR_HEADER, Uuid::new_v4().to_string())
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"confirm":true}"#))
        .unwrap();
    let resp = app.oneshot(req).await;
    assert_eq!(resp.status(), 403);
    assert_eq!(app.status_of(id).await, "pending");

    let resp = app
        .resolve_admin(&Uuid::new_v4().to_string(), true)
        .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_delete_is_gated() {
    let app = TestApp::new();
    let id = APPROVED_IDS[2];
    let uri = format!("/api/admin/applications/{id}");

    let resp = app.send_admin(Method::DELETE, &uri, None).await;
    let token = confirmation_token(resp).await;
    assert_eq!(app.send_admin(Method::GET, &uri, None).await.status(), 200);

    let resp = app.resolve_admin(&token, true).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(app.send_admin(Method::GET, &uri, None).await.status(), 404);
    assert_eq!(app.state.queue.stats().await.total, 7);
}

// ============================================================================
// Payment Flow
// ============================================================================

#[tokio::test]
async fn test_claim_payment_approval_and_completion() {
    let app = TestApp::new();
    let id = PENDING_IDS[0];

    let resp = app
        .send_admin(
            Method::POST,
            &format!("/api/admin/applications/{id}/claim"),
            None,
        )
        .await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert_eq!(json["status"], "under_review");
    assert_eq!(json["assigned_operator"], app.operator.to_string());

    let resp = app
        .send_admin(
            Method::POST,
            &format!("/api/admin/applications/{id}/request-payment"),
            Some(json!({ "fee": 0 })),
        )
        .await;
    assert_eq!(resp.status(), 400);

    let resp = app
        .send_admin(
            Method::POST,
            &format!("/api/admin/applications/{id}/request-payment"),
            Some(json!({ "fee": 2500 })),
        )
        .await;
    assert_eq!(resp.status(), 200);
    assert_eq!(body_to_json(resp).await["status"], "pending_payment");

    // Approval waits for the fee
    let resp = app
        .send_admin(
            Method::POST,
            &format!("/api/admin/applications/{id}/approve"),
            None,
        )
        .await;
    assert_eq!(resp.status(), 409);
    assert_eq!(body_to_json(resp).await["error"], "PAYMENT_OUTSTANDING");

    let resp = app
        .send(Method::POST, "/api/applications/track/nid-2026-000001/payment", None)
        .await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert_eq!(json["status"], "approved");
    assert_eq!(json["fee"], 2500);
    assert!(json["fee_paid_at"].is_string());

    let resp = app
        .send(Method::POST, "/api/applications/track/NID-2026-000001/payment", None)
        .await;
    assert_eq!(resp.status(), 409);
    assert_eq!(body_to_json(resp).await["error"], "NO_PAYMENT_DUE");

    let resp = app
        .send_admin(
            Method::POST,
            &format!("/api/admin/applications/{id}/complete"),
            None,
        )
        .await;
    assert_eq!(resp.status(), 200);
    let json = body_to_json(resp).await;
    assert_eq!(json["status"], "completed");
    assert_eq!(json["allowed_transitions"], json!([]));
}

#[tokio::test]
async fn test_track_unknown_code() {
    let app = TestApp::new();
    let resp = app
        .send(Method::GET, "/api/applications/track/NID-1999-ZZZZZZ", None)
        .await;
    assert_eq!(resp.status(), 404);
}
