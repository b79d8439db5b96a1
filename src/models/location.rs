use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LocationRow {
    pub id: i64,
    pub name: String,
    pub is_visible_appointment_scheduler: bool,
    pub place_of_service_code: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub address_line3: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub county_fips: Option<String>,
    pub county_name: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub state_name: Option<String>,
    pub country_name: Option<String>,
    pub phone_number: Option<String>,
    pub phone_type: String,
    pub phone_ext: Option<String>,
    pub is_primary_phone: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationAddress {
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub line3: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub county_fips: Option<String>,
    pub county_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub state_name: Option<String>,
    pub country_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationPhone {
    pub phone_number: String,
    pub phone_type: String,
    pub phone_ext: Option<String>,
    pub is_primary: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationResponse {
    pub id: i64,
    pub name: String,
    pub is_visible_appointment_scheduler: bool,
    pub place_of_service_code: Option<String>,
    pub address: LocationAddress,
    pub phones: Vec<LocationPhone>,
}

fn coordinate(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse().ok())
}

impl From<LocationRow> for LocationResponse {
    fn from(row: LocationRow) -> Self {
        // A location without a phone number reports no phones at all.
        let phones = row
            .phone_number
            .clone()
            .filter(|n| !n.is_empty())
            .map(|phone_number| LocationPhone {
                phone_number,
                phone_type: row.phone_type.clone(),
                phone_ext: row.phone_ext.clone(),
                is_primary: row.is_primary_phone,
            })
            .into_iter()
            .collect();

        Self {
            id: row.id,
            name: row.name,
            is_visible_appointment_scheduler: row.is_visible_appointment_scheduler,
            place_of_service_code: row.place_of_service_code,
            address: LocationAddress {
                line1: row.address_line1,
                line2: row.address_line2,
                line3: row.address_line3,
                city: row.city,
                zip_code: row.zip_code,
                county_fips: row.county_fips,
                county_name: row.county_name,
                latitude: coordinate(row.latitude.as_deref()),
                longitude: coordinate(row.longitude.as_deref()),
                state_name: row.state_name,
                country_name: row.country_name,
            },
            phones,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationsResponse {
    pub locations: Vec<LocationResponse>,
}
