use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::appointment::{AppointmentRow, AppointmentSlot, STATUS_CANCELLED, STATUS_SCHEDULED};
use crate::models::location::LocationRow;
use crate::models::patient::{PatientRequest, PatientRow, PatientSearchFields};
use crate::models::provider::{AppointmentResourceRow, ProviderRow, VisitReason};

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // An in-memory database lives and dies with its connection, so keep
        // exactly one open for the lifetime of the pool.
        let pool = if is_memory_url(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };

        Ok(Self { pool })
    }

    /// Fresh private database, mainly for tests.
    pub async fn in_memory() -> anyhow::Result<Self> {
        Self::connect("sqlite::memory:").await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run pending migrations from the migrations/ directory.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Delete every row from every table, children first.
    pub async fn purge(&self) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        for table in [
            "appointments",
            "patient_phones",
            "patient_addresses",
            "patients",
            "visit_reasons",
            "appointment_resources",
            "locations",
            "providers",
            "auth_tokens",
        ] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    // -- Reference data --

    pub async fn has_providers(&self) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM providers)")
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn list_providers(&self) -> anyhow::Result<Vec<ProviderRow>> {
        let rows = sqlx::query_as::<_, ProviderRow>(
            r#"SELECT id, npi, name, email, phone_number, specialty_name, specialty_taxonomy, last_name, first_name
               FROM providers ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_locations(&self) -> anyhow::Result<Vec<LocationRow>> {
        let rows = sqlx::query_as::<_, LocationRow>(
            r#"SELECT id, name, is_visible_appointment_scheduler, place_of_service_code,
                      address_line1, address_line2, address_line3, city, zip_code,
                      county_fips, county_name, latitude, longitude, state_name, country_name,
                      phone_number, phone_type, phone_ext, is_primary_phone
               FROM locations ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_appointment_resources(&self) -> anyhow::Result<Vec<AppointmentResourceRow>> {
        let rows = sqlx::query_as::<_, AppointmentResourceRow>(
            r#"SELECT id, business_entity_id, name, code, description, status, sort_code,
                      is_for_requests, appointment_confirmation, created_at, updated_at,
                      created_by, updated_by
               FROM appointment_resources ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_visit_reasons(&self) -> anyhow::Result<Vec<VisitReason>> {
        let rows = sqlx::query_as::<_, VisitReason>(
            "SELECT id, name, description FROM visit_reasons ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // -- Patient Operations --

    /// Insert a patient together with its addresses and phones. Returns the new id.
    pub async fn insert_patient(&self, request: &PatientRequest) -> anyhow::Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = now_naive();

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"INSERT INTO patients (id, first_name, last_name, date_of_birth, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&request.patient.first_name)
        .bind(&request.patient.last_name)
        .bind(&request.patient.date_of_birth)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for address in &request.addresses {
            sqlx::query(
                r#"INSERT INTO patient_addresses (patient_id, line1, line2, line3, city, state, zip_code, country_name, is_primary)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            )
            .bind(&id)
            .bind(&address.line1)
            .bind(&address.line2)
            .bind(&address.line3)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.zip_code)
            .bind(&address.country_name)
            .bind(address.is_primary)
            .execute(&mut *tx)
            .await?;
        }

        for phone in &request.phones {
            sqlx::query(
                r#"INSERT INTO patient_phones (patient_id, phone_number, phone_type_code, extension, is_primary)
                   VALUES (?, ?, ?, ?, ?)"#,
            )
            .bind(&id)
            .bind(&phone.phone_number)
            .bind(&phone.phone_type_code)
            .bind(&phone.extension)
            .bind(phone.is_primary)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    pub async fn get_patient(&self, id: &str) -> anyhow::Result<Option<PatientRow>> {
        let row = sqlx::query_as::<_, PatientRow>(
            "SELECT id, first_name, last_name, date_of_birth, created_at FROM patients WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn patient_exists(&self, id: &str) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM patients WHERE id = ?)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Names match case-insensitively as substrings; date of birth matches exactly.
    pub async fn search_patients(&self, fields: &PatientSearchFields) -> anyhow::Result<Vec<PatientRow>> {
        let rows = sqlx::query_as::<_, PatientRow>(
            r#"SELECT id, first_name, last_name, date_of_birth, created_at FROM patients
               WHERE (?1 IS NULL OR first_name LIKE '%' || ?1 || '%')
                 AND (?2 IS NULL OR last_name LIKE '%' || ?2 || '%')
                 AND (?3 IS NULL OR date_of_birth = ?3)
               ORDER BY created_at, id"#,
        )
        .bind(fields.first_name())
        .bind(fields.last_name())
        .bind(fields.date_of_birth())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_patients(&self) -> anyhow::Result<Vec<PatientRow>> {
        let rows = sqlx::query_as::<_, PatientRow>(
            "SELECT id, first_name, last_name, date_of_birth, created_at FROM patients ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // -- Appointment Operations --

    pub async fn insert_appointment(&self, patient_id: &str, slot: &AppointmentSlot) -> anyhow::Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = now_naive();

        sqlx::query(
            r#"INSERT INTO appointments (id, start_time, end_time, provider_id, location_id, visit_reason_id,
                                         resource_id, patient_id, status, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.provider_id)
        .bind(slot.location_id)
        .bind(slot.visit_reason_id)
        .bind(slot.resource_id)
        .bind(patient_id)
        .bind(STATUS_SCHEDULED)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn get_appointment(&self, id: &str) -> anyhow::Result<Option<AppointmentRow>> {
        let row = sqlx::query_as::<_, AppointmentRow>(
            r#"SELECT id, start_time, end_time, provider_id, location_id, visit_reason_id,
                      resource_id, patient_id, status
               FROM appointments WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Replace the schedulable fields. Patient and status are left alone.
    pub async fn update_appointment(&self, id: &str, slot: &AppointmentSlot) -> anyhow::Result<Option<AppointmentRow>> {
        let result = sqlx::query(
            r#"UPDATE appointments
               SET start_time = ?, end_time = ?, provider_id = ?, location_id = ?,
                   visit_reason_id = ?, resource_id = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.provider_id)
        .bind(slot.location_id)
        .bind(slot.visit_reason_id)
        .bind(slot.resource_id)
        .bind(now_naive())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_appointment(id).await
    }

    /// Cancellation is a status change; the row stays.
    pub async fn cancel_appointment(&self, id: &str) -> anyhow::Result<bool> {
        let result = sqlx::query("UPDATE appointments SET status = ?, updated_at = ? WHERE id = ?")
            .bind(STATUS_CANCELLED)
            .bind(now_naive())
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_appointments(&self) -> anyhow::Result<Vec<AppointmentRow>> {
        let rows = sqlx::query_as::<_, AppointmentRow>(
            r#"SELECT id, start_time, end_time, provider_id, location_id, visit_reason_id,
                      resource_id, patient_id, status
               FROM appointments ORDER BY start_time"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Current time as stored in naive timestamp columns.
pub fn now_naive() -> NaiveDateTime {
    Utc::now().naive_utc()
}
