use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::iso_naive;

pub const STATUS_SCHEDULED: &str = "scheduled";
pub const STATUS_CANCELLED: &str = "cancelled";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentRow {
    pub id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub provider_id: i64,
    pub location_id: i64,
    pub visit_reason_id: i64,
    pub resource_id: i64,
    pub patient_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentPatient {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentCreate {
    pub start_time: String,
    pub end_time: String,
    pub provider_id: i64,
    pub location_id: i64,
    pub visit_reason_id: i64,
    pub resource_id: i64,
    pub patient: AppointmentPatient,
}

/// Body of `POST /v2/appointments` and `PUT /v2/appointments/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub appointment: AppointmentCreate,
}

/// The schedulable part of an appointment, with times already parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentSlot {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub provider_id: i64,
    pub location_id: i64,
    pub visit_reason_id: i64,
    pub resource_id: i64,
}

impl AppointmentCreate {
    /// Parse both timestamps; `None` if either is not a recognised format.
    pub fn slot(&self) -> Option<AppointmentSlot> {
        Some(AppointmentSlot {
            start_time: super::parse_timestamp(&self.start_time)?,
            end_time: super::parse_timestamp(&self.end_time)?,
            provider_id: self.provider_id,
            location_id: self.location_id,
            visit_reason_id: self.visit_reason_id,
            resource_id: self.resource_id,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppointmentCreateResponse {
    pub appointment: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub id: String,
    pub start_time: String,
    pub end_time: String,
    pub provider_id: i64,
    pub location_id: i64,
    pub visit_reason_id: i64,
    pub resource_id: i64,
    pub patient_id: String,
    pub status: String,
}

impl From<AppointmentRow> for AppointmentResponse {
    fn from(row: AppointmentRow) -> Self {
        Self {
            id: row.id,
            start_time: iso_naive(&row.start_time),
            end_time: iso_naive(&row.end_time),
            provider_id: row.provider_id,
            location_id: row.location_id,
            visit_reason_id: row.visit_reason_id,
            resource_id: row.resource_id,
            patient_id: row.patient_id,
            status: row.status,
        }
    }
}
