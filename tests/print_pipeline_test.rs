mod common;

use std::sync::Arc;

use axum::http::{header, Method, StatusCode};
use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{response_bytes, response_json, FailingPdfEngine, TestApp};

async fn create_bare_job_card(app: &TestApp) -> Value {
    let response = app
        .request(
            Method::POST,
            "/api/job-cards",
            Some(json!({
                "vehicleName": "Scania R450",
                "vehicleIdentifier": "KBX 204T"
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    response_json(response).await
}

#[tokio::test]
async fn printing_with_no_templates_uses_the_builtin_fallback() {
    let app = TestApp::new().await;
    let card = create_bare_job_card(&app).await;

    let response = app
        .request(
            Method::POST,
            "/api/job-cards/print",
            Some(json!({ "jobCardId": card["id"] })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"job-card-JC-0001.pdf\""
    );

    let body = String::from_utf8(response_bytes(response).await).unwrap();
    assert!(body.starts_with("%PDF-STUB"));
    // Built-in template marker
    assert!(body.contains("Generated by FleetDesk"));
    // Card data substituted in
    assert!(body.contains("JC-0001"));
    assert!(body.contains("Scania R450"));
    // No leftover placeholders
    assert!(!body.contains("{{"));
}

#[tokio::test]
async fn empty_card_renders_placeholder_rows_and_zero_total() {
    let app = TestApp::new().await;
    let card = create_bare_job_card(&app).await;

    let response = app
        .request(
            Method::POST,
            "/api/job-cards/print",
            Some(json!({ "jobCardId": card["id"] })),
        )
        .await;
    let body = String::from_utf8(response_bytes(response).await).unwrap();

    assert!(body.contains("No tasks specified"));
    assert!(body.contains("No parts specified"));
    assert!(body.contains("$0.00"));
    assert!(body.contains("N/A")); // driver and mechanic unset
    assert!(body.contains("None reported"));
}

#[tokio::test]
async fn print_audit_increments_exactly_once_per_print() {
    let app = TestApp::new().await;
    let card = create_bare_job_card(&app).await;
    let card_id = card["id"].as_str().unwrap().to_string();
    let before: DateTime<Utc> = Utc::now();

    for expected_count in 1..=2 {
        let response = app
            .request(
                Method::POST,
                "/api/job-cards/print",
                Some(json!({ "jobCardId": card_id, "userId": "clerk-7" })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .request(Method::GET, &format!("/api/job-cards/{}", card_id), None)
            .await;
        let fetched = response_json(response).await;

        assert_eq!(fetched["printCount"], expected_count);
        assert_eq!(fetched["printedBy"], "clerk-7");

        let printed_at: DateTime<Utc> =
            fetched["printedAt"].as_str().unwrap().parse().unwrap();
        assert!(printed_at >= before);
    }
}

#[tokio::test]
async fn explicit_template_id_overrides_the_default() {
    let app = TestApp::new().await;
    let card = create_bare_job_card(&app).await;

    // A default-active template exists...
    let response = app
        .request(
            Method::POST,
            "/api/job-card-templates",
            Some(json!({
                "name": "Workshop default",
                "html": "<html><body>WORKSHOP LAYOUT {{jobCardNo}}</body></html>",
                "isDefault": true
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // ...and a second, non-default one.
    let response = app
        .request(
            Method::POST,
            "/api/job-card-templates",
            Some(json!({
                "name": "Customer copy",
                "html": "<html><body>CUSTOMER COPY {{jobCardNo}} {{totalCost}}</body></html>"
            })),
        )
        .await;
    let custom = response_json(response).await;

    // No explicit id: default-active wins over the fallback.
    let response = app
        .request(
            Method::POST,
            "/api/job-cards/print",
            Some(json!({ "jobCardId": card["id"] })),
        )
        .await;
    let body = String::from_utf8(response_bytes(response).await).unwrap();
    assert!(body.contains("WORKSHOP LAYOUT JC-0001"));
    assert!(!body.contains("Generated by FleetDesk"));

    // Explicit id beats the default.
    let response = app
        .request(
            Method::POST,
            "/api/job-cards/print",
            Some(json!({ "jobCardId": card["id"], "templateId": custom["id"] })),
        )
        .await;
    let body = String::from_utf8(response_bytes(response).await).unwrap();
    assert!(body.contains("CUSTOMER COPY JC-0001 $0.00"));
    assert!(!body.contains("WORKSHOP LAYOUT"));
}

#[tokio::test]
async fn unknown_ids_yield_json_not_found() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/job-cards/print",
            Some(json!({ "jobCardId": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Not Found");

    // Explicit template id that does not exist is also a 404.
    let app = TestApp::new().await;
    let card = create_bare_job_card(&app).await;
    let response = app
        .request(
            Method::POST,
            "/api/job-cards/print",
            Some(json!({ "jobCardId": card["id"], "templateId": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn render_failure_surfaces_as_generic_500_and_skips_the_audit() {
    let app = TestApp::with_engine(Arc::new(FailingPdfEngine)).await;
    let card = create_bare_job_card(&app).await;
    let card_id = card["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            Method::POST,
            "/api/job-cards/print",
            Some(json!({ "jobCardId": card_id })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert_eq!(body["message"], "PDF generation failed");

    // A failed render never counts as a print.
    let response = app
        .request(Method::GET, &format!("/api/job-cards/{}", card_id), None)
        .await;
    let fetched = response_json(response).await;
    assert_eq!(fetched["printCount"], 0);
    assert!(fetched["printedAt"].is_null());
}

#[tokio::test]
async fn tasks_and_parts_render_into_their_tables() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/job-cards",
            Some(json!({
                "vehicleName": "Volvo FH16",
                "vehicleIdentifier": "KCD 112Q",
                "mechanicName": "A. Mwangi",
                "tasks": [
                    { "description": "Replace clutch plate", "status": "completed", "hours": "6.5" }
                ],
                "parts": [
                    { "name": "Clutch plate", "partNumber": "CP-220", "quantity": 1, "unitCost": "480.00" },
                    { "name": "Gear oil", "partNumber": "GO-75W90", "quantity": 4, "unitCost": "12.50" }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let card = response_json(response).await;
    assert_eq!(common::decimal_field(&card, "totalCost"), dec!(530));

    let response = app
        .request(
            Method::POST,
            "/api/job-cards/print",
            Some(json!({ "jobCardId": card["id"] })),
        )
        .await;
    let body = String::from_utf8(response_bytes(response).await).unwrap();

    assert!(body.contains("Replace clutch plate"));
    assert!(body.contains("CP-220"));
    assert!(body.contains("$12.50"));
    assert!(body.contains("$50.00")); // gear oil line total
    assert!(body.contains("$530.00"));
    assert!(!body.contains("No tasks specified"));
    assert!(!body.contains("No parts specified"));
}
