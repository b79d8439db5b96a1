use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PatientRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    #[serde(skip)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientAddress {
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    #[serde(default)]
    pub line3: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country_name: String,
    #[serde(default = "default_true")]
    pub is_primary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientPhone {
    pub phone_number: String,
    #[serde(default = "default_phone_type")]
    pub phone_type_code: String,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default = "default_true")]
    pub is_primary: bool,
}

fn default_country() -> String {
    "USA".to_string()
}

fn default_phone_type() -> String {
    "M".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientCreate {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}

/// Body of `POST /v2/patients`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRequest {
    pub patient: PatientCreate,
    #[serde(default)]
    pub addresses: Vec<PatientAddress>,
    #[serde(default)]
    pub phones: Vec<PatientPhone>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PatientCreateResponse {
    pub patient: String,
}

/// Search criteria. Blank or missing fields do not filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientSearchFields {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

impl PatientSearchFields {
    fn non_blank(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn first_name(&self) -> Option<&str> {
        Self::non_blank(&self.first_name)
    }

    pub fn last_name(&self) -> Option<&str> {
        Self::non_blank(&self.last_name)
    }

    pub fn date_of_birth(&self) -> Option<&str> {
        Self::non_blank(&self.date_of_birth)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientSearchRequest {
    pub fields: PatientSearchFields,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PatientResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
}

impl From<PatientRow> for PatientResponse {
    fn from(row: PatientRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            date_of_birth: row.date_of_birth,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PatientSearchResponse {
    pub patients: Vec<PatientResponse>,
}
