use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use super::ApiJson;
use crate::errors::AppError;
use crate::models::appointment::{
    AppointmentCreateResponse, AppointmentRequest, AppointmentResponse, AppointmentSlot,
};
use crate::AppState;

fn parse_slot(payload: &AppointmentRequest) -> Result<AppointmentSlot, AppError> {
    payload
        .appointment
        .slot()
        .ok_or_else(|| AppError::BadRequest("Invalid datetime format".to_string()))
}

/// POST /v2/appointments
/// Book an appointment for an existing patient.
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<AppointmentRequest>,
) -> Result<Json<AppointmentCreateResponse>, AppError> {
    let patient_id = &payload.appointment.patient.id;
    if !state.db.patient_exists(patient_id).await? {
        return Err(AppError::BadRequest("Patient not found".to_string()));
    }

    let slot = parse_slot(&payload)?;
    let id = state.db.insert_appointment(patient_id, &slot).await?;
    tracing::info!(appointment_id = %id, %patient_id, "booked appointment");

    Ok(Json(AppointmentCreateResponse { appointment: id }))
}

/// GET /v2/appointments/:id
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let row = state
        .db
        .get_appointment(&id)
        .await?
        .ok_or(AppError::NotFound("Appointment not found"))?;
    Ok(Json(row.into()))
}

/// PUT /v2/appointments/:id
/// Reschedule. The patient in the body is ignored.
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<AppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    if state.db.get_appointment(&id).await?.is_none() {
        return Err(AppError::NotFound("Appointment not found"));
    }

    let slot = parse_slot(&payload)?;
    let row = state
        .db
        .update_appointment(&id, &slot)
        .await?
        .ok_or(AppError::NotFound("Appointment not found"))?;
    tracing::info!(appointment_id = %id, "rescheduled appointment");

    Ok(Json(row.into()))
}

/// DELETE /v2/appointments/:id
/// Marks the appointment cancelled.
pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !state.db.cancel_appointment(&id).await? {
        return Err(AppError::NotFound("Appointment not found"));
    }
    tracing::info!(appointment_id = %id, "cancelled appointment");
    Ok(Json(json!({ "message": "Appointment cancelled successfully" })))
}
