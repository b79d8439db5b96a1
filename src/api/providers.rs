//! Read-only reference data: providers, locations, bookable resources and
//! visit reasons. All of it comes from the seed set.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::models::location::{LocationResponse, LocationsResponse};
use crate::models::provider::{
    AppointmentResourceResponse, ProviderResponse, ProvidersResponse, VisitReason,
};
use crate::AppState;

/// GET /v2/providers
pub async fn list_providers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProvidersResponse>, AppError> {
    let rows = state.db.list_providers().await?;
    Ok(Json(ProvidersResponse {
        providers: rows.into_iter().map(ProviderResponse::from).collect(),
    }))
}

/// GET /v2/locations
pub async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LocationsResponse>, AppError> {
    let rows = state.db.list_locations().await?;
    Ok(Json(LocationsResponse {
        locations: rows.into_iter().map(LocationResponse::from).collect(),
    }))
}

/// GET /v2/appointment_resources
/// A bare array, unlike the other listings.
pub async fn list_appointment_resources(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AppointmentResourceResponse>>, AppError> {
    let rows = state.db.list_appointment_resources().await?;
    Ok(Json(
        rows.into_iter()
            .map(AppointmentResourceResponse::from)
            .collect(),
    ))
}

/// GET /v2/visit_reasons
pub async fn list_visit_reasons(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<VisitReason>>, AppError> {
    Ok(Json(state.db.list_visit_reasons().await?))
}
