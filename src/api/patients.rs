use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use super::ApiJson;
use crate::errors::AppError;
use crate::models::patient::{
    PatientCreateResponse, PatientRequest, PatientResponse, PatientSearchRequest,
    PatientSearchResponse,
};
use crate::AppState;

/// POST /v2/patients
/// Register a patient with addresses and phones.
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<PatientRequest>,
) -> Result<Json<PatientCreateResponse>, AppError> {
    let id = state.db.insert_patient(&payload).await?;
    tracing::info!(
        patient_id = %id,
        addresses = payload.addresses.len(),
        phones = payload.phones.len(),
        "created patient"
    );
    Ok(Json(PatientCreateResponse { patient: id }))
}

/// POST /v2/patients/search
pub async fn search_patients(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<PatientSearchRequest>,
) -> Result<Json<PatientSearchResponse>, AppError> {
    let rows = state.db.search_patients(&payload.fields).await?;
    Ok(Json(PatientSearchResponse {
        patients: rows.into_iter().map(PatientResponse::from).collect(),
    }))
}

/// GET /v2/patients/:id
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PatientResponse>, AppError> {
    let row = state
        .db
        .get_patient(&id)
        .await?
        .ok_or(AppError::NotFound("Patient not found"))?;
    Ok(Json(row.into()))
}
