mod common;

use axum::http::{Method, StatusCode};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

use common::{decimal_field, response_json, TestApp};

#[tokio::test]
async fn job_card_numbers_are_sequential() {
    let app = TestApp::new().await;

    for expected in ["JC-0001", "JC-0002", "JC-0003"] {
        let response = app
            .request(
                Method::POST,
                "/api/job-cards",
                Some(json!({
                    "vehicleName": "DAF XF",
                    "vehicleIdentifier": "KDA 330B"
                })),
            )
            .await;
        let card = response_json(response).await;
        assert_eq!(card["jobCardNo"], expected);
        assert_eq!(card["status"], "draft");
        assert_eq!(card["printCount"], 0);
    }
}

#[tokio::test]
async fn replacing_parts_recomputes_total_cost() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/job-cards",
            Some(json!({
                "vehicleName": "MAN TGX",
                "vehicleIdentifier": "KBZ 871J",
                "parts": [
                    { "name": "Air filter", "partNumber": "AF-90", "quantity": 2, "unitCost": "18.00" }
                ]
            })),
        )
        .await;
    let card = response_json(response).await;
    assert_eq!(decimal_field(&card, "totalCost"), dec!(36));
    let id = card["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            Method::PUT,
            &format!("/api/job-cards/{}", id),
            Some(json!({
                "parts": [
                    { "name": "Air filter", "partNumber": "AF-90", "quantity": 1, "unitCost": "18.00" },
                    { "name": "Cabin filter", "partNumber": "CF-12", "quantity": 1, "unitCost": "9.75" }
                ]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = response_json(response).await;
    assert_eq!(decimal_field(&updated, "totalCost"), dec!(27.75));

    // Updating unrelated fields leaves the total untouched.
    let response = app
        .request(
            Method::PUT,
            &format!("/api/job-cards/{}", id),
            Some(json!({ "mechanicName": "J. Kamau" })),
        )
        .await;
    let updated = response_json(response).await;
    assert_eq!(decimal_field(&updated, "totalCost"), dec!(27.75));
    assert_eq!(updated["mechanicName"], "J. Kamau");
}

#[tokio::test]
async fn status_transitions_follow_the_lifecycle() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/job-cards",
            Some(json!({
                "vehicleName": "Isuzu FRR",
                "vehicleIdentifier": "KCK 402L"
            })),
        )
        .await;
    let card = response_json(response).await;
    let id = card["id"].as_str().unwrap().to_string();

    let response = app
        .request(Method::POST, &format!("/api/job-cards/{}/activate", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["status"], "active");

    // Active cards cannot be re-activated.
    let response = app
        .request(Method::POST, &format!("/api/job-cards/{}/activate", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request(Method::POST, &format!("/api/job-cards/{}/complete", id), None)
        .await;
    assert_eq!(response_json(response).await["status"], "completed");

    // Completed cards cannot be cancelled.
    let response = app
        .request(Method::POST, &format!("/api/job-cards/{}/cancel", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn qr_token_grants_public_lookup() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/job-cards",
            Some(json!({
                "vehicleName": "Scania G410",
                "vehicleIdentifier": "ZE 1182"
            })),
        )
        .await;
    let card = response_json(response).await;
    let token = card["qrToken"].as_str().unwrap().to_string();

    let response = app
        .request(Method::GET, &format!("/api/job-cards/by-token/{}", token), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = response_json(response).await;
    assert_eq!(fetched["id"], card["id"]);

    let response = app
        .request(Method::GET, "/api/job-cards/by-token/nope", None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_status_and_paginates() {
    let app = TestApp::new().await;

    for i in 0..3 {
        let response = app
            .request(
                Method::POST,
                "/api/job-cards",
                Some(json!({
                    "vehicleName": format!("Truck {}", i),
                    "vehicleIdentifier": format!("KAA {:03}A", i)
                })),
            )
            .await;
        let card = response_json(response).await;
        if i == 0 {
            let id = card["id"].as_str().unwrap().to_string();
            app.request(Method::POST, &format!("/api/job-cards/{}/activate", id), None)
                .await;
        }
    }

    let response = app
        .request(Method::GET, "/api/job-cards?status=draft", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["pagination"]["total"], 2);

    let response = app
        .request(Method::GET, "/api/job-cards?page=1&perPage=2", None)
        .await;
    let body = response_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["totalPages"], 2);

    let response = app
        .request(Method::GET, "/api/job-cards?status=bogus", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn creation_validates_required_fields() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/job-cards",
            Some(json!({ "vehicleName": "", "vehicleIdentifier": "KAB 001X" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert_eq!(body["error"], "Bad Request");
}

#[tokio::test]
async fn unknown_job_card_is_a_404() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::GET,
            &format!("/api/job-cards/{}", Uuid::new_v4()),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
