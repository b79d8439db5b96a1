use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::iso_naive;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProviderRow {
    pub id: i64,
    pub npi: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub specialty_name: Option<String>,
    pub specialty_taxonomy: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderSpecialty {
    pub name: String,
    pub taxonomy: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub id: i64,
    pub npi: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub specialty: ProviderSpecialty,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
}

impl From<ProviderRow> for ProviderResponse {
    fn from(row: ProviderRow) -> Self {
        Self {
            id: row.id,
            npi: row.npi,
            name: row.name,
            email: row.email,
            phone_number: row.phone_number,
            specialty: ProviderSpecialty {
                name: row.specialty_name.unwrap_or_default(),
                taxonomy: row.specialty_taxonomy.unwrap_or_default(),
            },
            last_name: row.last_name,
            first_name: row.first_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderResponse>,
}

// ── Appointment resources ────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppointmentResourceRow {
    pub id: i64,
    pub business_entity_id: Option<String>,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub sort_code: i64,
    pub is_for_requests: bool,
    pub appointment_confirmation: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppointmentResourceDetail {
    pub id: i64,
    pub business_entity_id: String,
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub sort_code: i64,
    pub created_at: String,
    pub updated_at: String,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub is_for_requests: bool,
    pub appointment_confirmation: String,
}

/// The vendor wraps each resource in its own `{"resource": ...}` object.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppointmentResourceResponse {
    pub resource: AppointmentResourceDetail,
}

impl From<AppointmentResourceRow> for AppointmentResourceResponse {
    fn from(row: AppointmentResourceRow) -> Self {
        Self {
            resource: AppointmentResourceDetail {
                id: row.id,
                business_entity_id: row.business_entity_id.unwrap_or_default(),
                name: row.name,
                code: row.code,
                description: row.description,
                status: row.status,
                sort_code: row.sort_code,
                created_at: iso_naive(&row.created_at),
                updated_at: iso_naive(&row.updated_at),
                created_by: row.created_by,
                updated_by: row.updated_by,
                is_for_requests: row.is_for_requests,
                appointment_confirmation: row.appointment_confirmation,
            },
        }
    }
}

// ── Visit reasons ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VisitReason {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}
