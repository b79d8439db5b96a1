//! Static reference data the mock starts with.
//!
//! One provider, one location, one bookable resource, five visit reasons and
//! a sample patient, with ids matching the vendor sandbox so recorded client
//! fixtures keep working.

use super::sqlite::{now_naive, Store};

pub const SEED_PROVIDER_ID: i64 = 40483;
pub const SEED_LOCATION_ID: i64 = 55491;
pub const SEED_RESOURCE_ID: i64 = 37367;
pub const SEED_PATIENT_ID: &str = "37d480d1-fe7d-4600-bbb1-bd79367e418d";

const VISIT_REASONS: [(i64, &str); 5] = [
    (119107, "RE-EVALUATION VISIT"),
    (119106, "DISCHARGE VISIT"),
    (119105, "PROGRESS VISIT"),
    (119104, "STANDARD VISIT"),
    (119103, "INITIAL VISIT"),
];

/// Load the seed rows unless a provider already exists. Returns whether
/// anything was written.
pub async fn create_seed_data(store: &Store) -> anyhow::Result<bool> {
    if store.has_providers().await? {
        tracing::info!("Seed data already exists, skipping initialization");
        return Ok(false);
    }

    tracing::info!("Creating seed data...");
    let now = now_naive();
    let mut tx = store.pool().begin().await?;

    sqlx::query(
        r#"INSERT INTO providers (id, npi, name, email, phone_number, specialty_name, specialty_taxonomy, last_name, first_name, created_at)
           VALUES (?, NULL, ?, NULL, ?, ?, ?, NULL, NULL, ?)"#,
    )
    .bind(SEED_PROVIDER_ID)
    .bind("Dr. Kris Duggan")
    .bind("6507223020")
    .bind("Single Specialty")
    .bind("193400000X")
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"INSERT INTO locations (id, name, is_visible_appointment_scheduler, place_of_service_code,
                                  address_line1, city, zip_code, county_fips, county_name,
                                  latitude, longitude, state_name, country_name,
                                  phone_number, phone_type, is_primary_phone, created_at)
           VALUES (?, ?, 1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'Main', 1, ?)"#,
    )
    .bind(SEED_LOCATION_ID)
    .bind("LUNA CARE PHYSICAL THERAPY")
    .bind("11")
    .bind("15 CENTURY BLVD STE 300")
    .bind("NASHVILLE")
    .bind("37214-3692")
    .bind("47037")
    .bind("Davidson")
    .bind("36.14568")
    .bind("-86.68619")
    .bind("Tennessee")
    .bind("UNITED STATES")
    .bind("6507223020")
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"INSERT INTO appointment_resources (id, business_entity_id, name, status, sort_code, is_for_requests,
                                              appointment_confirmation, created_at, updated_at, created_by, updated_by)
           VALUES (?, ?, ?, 'A', 1, 1, 'P', ?, ?, ?, ?)"#,
    )
    .bind(SEED_RESOURCE_ID)
    .bind("fdad613f-20b6-4213-95dd-259bfccbc6a8")
    .bind("DR. KRIS DUGGAN")
    .bind(now)
    .bind(now)
    .bind(1208112_i64)
    .bind(1208112_i64)
    .execute(&mut *tx)
    .await?;

    for (id, name) in VISIT_REASONS {
        sqlx::query("INSERT INTO visit_reasons (id, name, description) VALUES (?, ?, NULL)")
            .bind(id)
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query(
        r#"INSERT INTO patients (id, first_name, last_name, date_of_birth, created_at, updated_at)
           VALUES (?, 'John', 'Doe', '1970-01-01', ?, ?)"#,
    )
    .bind(SEED_PATIENT_ID)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"INSERT INTO patient_addresses (patient_id, line1, line2, city, state, zip_code, country_name, is_primary)
           VALUES (?, '123 Main St', '', 'Lyons', 'CO', '80540', 'USA', 1)"#,
    )
    .bind(SEED_PATIENT_ID)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"INSERT INTO patient_phones (patient_id, phone_number, phone_type_code, extension, is_primary)
           VALUES (?, '303-867-5309', 'M', '', 1)"#,
    )
    .bind(SEED_PATIENT_ID)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!("Seed data created successfully");
    Ok(true)
}
