//! Minimal HTML viewer over the stored patients and appointments.

use std::sync::Arc;

use axum::{extract::State, response::Html};
use tera::{Context, Tera};

use crate::errors::AppError;
use crate::models::appointment::AppointmentResponse;
use crate::models::patient::PatientResponse;
use crate::AppState;

// Compiled into the binary so the viewer works from any working directory.
const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../../templates/base.html")),
    ("index.html", include_str!("../../templates/index.html")),
    ("patients.html", include_str!("../../templates/patients.html")),
    ("appointments.html", include_str!("../../templates/appointments.html")),
];

/// Parse the viewer templates. `.html` names get tera's autoescaping.
pub fn templates() -> anyhow::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;
    tracing::debug!("Loaded {} templates", tera.get_template_names().count());
    Ok(tera)
}

fn render(state: &AppState, name: &str, title: &str, mut context: Context) -> Result<Html<String>, AppError> {
    context.insert("site_title", &state.config.api_title);
    context.insert("title", title);

    let html = state
        .templates
        .render(name, &context)
        .map_err(|e| anyhow::Error::from(e).context(format!("rendering {}", name)))?;
    Ok(Html(html))
}

/// GET /ui
pub async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    render(&state, "index.html", &state.config.api_title, Context::new())
}

/// GET /ui/patients
pub async fn patients(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let patients: Vec<PatientResponse> = state
        .db
        .list_patients()
        .await?
        .into_iter()
        .map(PatientResponse::from)
        .collect();

    let mut context = Context::new();
    context.insert("patients", &patients);
    render(&state, "patients.html", "Patients", context)
}

/// GET /ui/appointments
pub async fn appointments(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let appointments: Vec<AppointmentResponse> = state
        .db
        .list_appointments()
        .await?
        .into_iter()
        .map(AppointmentResponse::from)
        .collect();

    let mut context = Context::new();
    context.insert("appointments", &appointments);
    render(&state, "appointments.html", "Appointments", context)
}
