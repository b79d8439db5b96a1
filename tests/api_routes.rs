//! Patients, appointments, reference data and the HTML viewer behind the gate.

mod common;

use axum::http::{header, StatusCode};
use serde_json::{json, Value};

use carecloud_mock::store::seed::{
    SEED_LOCATION_ID, SEED_PATIENT_ID, SEED_PROVIDER_ID, SEED_RESOURCE_ID,
};
use common::{authed, body_json, body_text, json_request, spawn_app, TestApp};

fn appointment_body(patient_id: &str, start: &str, end: &str) -> Value {
    json!({
        "appointment": {
            "start_time": start,
            "end_time": end,
            "provider_id": SEED_PROVIDER_ID,
            "location_id": SEED_LOCATION_ID,
            "visit_reason_id": 119104,
            "resource_id": SEED_RESOURCE_ID,
            "patient": {"id": patient_id}
        }
    })
}

async fn create_patient(app: &TestApp, token: &str, first: &str, last: &str, dob: &str) -> String {
    let response = app
        .send(json_request(
            "POST",
            "/v2/patients",
            token,
            &json!({
                "patient": {"first_name": first, "last_name": last, "date_of_birth": dob},
                "addresses": [{"line1": "1 Elm St", "city": "Boulder", "state": "CO", "zip_code": "80301"}],
                "phones": [{"phone_number": "303-555-0100"}]
            }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["patient"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_patient_create_get_and_search() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    let id = create_patient(&app, &token, "Jane", "Roe", "1985-02-03").await;

    let response = app
        .send(authed("GET", &format!("/v2/patients/{}", id), &token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let patient = body_json(response).await;
    assert_eq!(patient["id"], id.as_str());
    assert_eq!(patient["first_name"], "Jane");
    assert_eq!(patient["date_of_birth"], "1985-02-03");

    let response = app
        .send(json_request(
            "POST",
            "/v2/patients/search",
            &token,
            &json!({"fields": {"last_name": "ro"}}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let found = body_json(response).await;
    let patients = found["patients"].as_array().unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0]["id"], id.as_str());
}

#[tokio::test]
async fn test_search_with_no_fields_returns_everyone() {
    let app = spawn_app().await;
    let token = app.issue_token().await;
    create_patient(&app, &token, "Jane", "Roe", "1985-02-03").await;

    let response = app
        .send(json_request(
            "POST",
            "/v2/patients/search",
            &token,
            &json!({"fields": {}}),
        ))
        .await;
    let found = body_json(response).await;
    assert_eq!(found["patients"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_by_date_of_birth_is_exact() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    let response = app
        .send(json_request(
            "POST",
            "/v2/patients/search",
            &token,
            &json!({"fields": {"date_of_birth": "1970-01-01"}}),
        ))
        .await;
    let found = body_json(response).await;
    let patients = found["patients"].as_array().unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0]["id"], SEED_PATIENT_ID);
}

#[tokio::test]
async fn test_unknown_patient_is_404() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    let response = app
        .send(authed("GET", "/v2/patients/does-not-exist", &token))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"]["message"], "Patient not found");
}

#[tokio::test]
async fn test_patient_payload_missing_fields_is_rejected() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    let response = app
        .send(json_request(
            "POST",
            "/v2/patients",
            &token,
            &json!({"patient": {"first_name": "Jane"}}),
        ))
        .await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_appointment_lifecycle() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    let response = app
        .send(json_request(
            "POST",
            "/v2/appointments",
            &token,
            &appointment_body(SEED_PATIENT_ID, "2024-07-01T15:00:00Z", "2024-07-01T15:45:00Z"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let id = body_json(response).await["appointment"]
        .as_str()
        .unwrap()
        .to_string();

    let uri = format!("/v2/appointments/{}", id);
    let response = app.send(authed("GET", &uri, &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let appointment = body_json(response).await;
    assert_eq!(appointment["start_time"], "2024-07-01T15:00:00");
    assert_eq!(appointment["end_time"], "2024-07-01T15:45:00");
    assert_eq!(appointment["patient_id"], SEED_PATIENT_ID);
    assert_eq!(appointment["status"], "scheduled");

    let response = app
        .send(json_request(
            "PUT",
            &uri,
            &token,
            &appointment_body(SEED_PATIENT_ID, "2024-07-02T09:00:00", "2024-07-02T09:30:00"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["start_time"], "2024-07-02T09:00:00");
    assert_eq!(updated["status"], "scheduled");

    let response = app.send(authed("DELETE", &uri, &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["message"],
        "Appointment cancelled successfully"
    );

    let response = app.send(authed("GET", &uri, &token)).await;
    assert_eq!(body_json(response).await["status"], "cancelled");
}

#[tokio::test]
async fn test_appointment_for_unknown_patient_is_400() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    let response = app
        .send(json_request(
            "POST",
            "/v2/appointments",
            &token,
            &appointment_body("nobody", "2024-07-01T15:00:00Z", "2024-07-01T15:45:00Z"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"]["message"], "Patient not found");
}

#[tokio::test]
async fn test_appointment_with_bad_datetime_is_400() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    let response = app
        .send(json_request(
            "POST",
            "/v2/appointments",
            &token,
            &appointment_body(SEED_PATIENT_ID, "tomorrow", "2024-07-01T15:45:00Z"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"]["message"],
        "Invalid datetime format"
    );
}

#[tokio::test]
async fn test_missing_appointment_is_404_for_every_verb() {
    let app = spawn_app().await;
    let token = app.issue_token().await;
    let uri = "/v2/appointments/missing";

    let response = app.send(authed("GET", uri, &token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(json_request(
            "PUT",
            uri,
            &token,
            &appointment_body(SEED_PATIENT_ID, "2024-07-01T15:00:00Z", "2024-07-01T15:45:00Z"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.send(authed("DELETE", uri, &token)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reference_data_comes_from_seed() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    let providers = body_json(app.send(authed("GET", "/v2/providers", &token)).await).await;
    let provider = &providers["providers"][0];
    assert_eq!(provider["id"], SEED_PROVIDER_ID);
    assert_eq!(provider["specialty"]["taxonomy"], "193400000X");

    let locations = body_json(app.send(authed("GET", "/v2/locations", &token)).await).await;
    let location = &locations["locations"][0];
    assert_eq!(location["id"], SEED_LOCATION_ID);
    assert_eq!(location["address"]["latitude"], 36.14568);
    assert_eq!(location["phones"].as_array().unwrap().len(), 1);

    let resources =
        body_json(app.send(authed("GET", "/v2/appointment_resources", &token)).await).await;
    assert_eq!(resources.as_array().unwrap().len(), 1);
    assert_eq!(resources[0]["resource"]["id"], SEED_RESOURCE_ID);

    let reasons = body_json(app.send(authed("GET", "/v2/visit_reasons", &token)).await).await;
    let ids: Vec<i64> = reasons
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![119107, 119106, 119105, 119104, 119103]);
}

#[tokio::test]
async fn test_ui_lists_patients_as_html() {
    let app = spawn_app().await;
    let token = app.issue_token().await;
    create_patient(&app, &token, "<Eve>", "Roe", "1990-01-01").await;

    let response = app.send(authed("GET", "/ui/patients", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = body_text(response).await;
    assert!(html.contains(SEED_PATIENT_ID));
    assert!(html.contains("&lt;Eve&gt;"));
    assert!(!html.contains("<Eve>"));
}

#[tokio::test]
async fn test_ui_appointments_page_renders_empty_state() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    let response = app.send(authed("GET", "/ui/appointments", &token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No appointments."));
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let app = spawn_app().await;
    let response = app.send(common::anonymous("GET", "/health")).await;

    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
}

#[tokio::test]
async fn test_get_on_search_route_is_method_not_allowed() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    // `search` is a static route, so it never falls through to the `:id` lookup.
    let response = app
        .send(authed("GET", "/v2/patients/search", &token))
        .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_ui_lists_booked_appointments() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    let response = app
        .send(json_request(
            "POST",
            "/v2/appointments",
            &token,
            &appointment_body(SEED_PATIENT_ID, "2024-07-01T15:00:00Z", "2024-07-01T15:45:00Z"),
        ))
        .await;
    let id = body_json(response).await["appointment"]
        .as_str()
        .unwrap()
        .to_string();

    let html = body_text(app.send(authed("GET", "/ui/appointments", &token)).await).await;
    assert!(html.contains(&id));
    assert!(html.contains("2024-07-01T15:00:00"));
    assert!(html.contains("scheduled"));
    assert!(!html.contains("No appointments."));
}

#[tokio::test]
async fn test_ui_home_uses_configured_title() {
    let app = spawn_app().await;
    let token = app.issue_token().await;

    let html = body_text(app.send(authed("GET", "/ui", &token)).await).await;
    assert!(html.contains("<h1>Fake CareCloud API</h1>"));
}
