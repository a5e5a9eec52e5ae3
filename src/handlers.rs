use crate::dashboard::load_dashboard;
use crate::errors::AppError;
use crate::models::{DashboardData, HealthResponse};
use crate::state::AppState;
use crate::ui::render_dashboard;
use axum::{
    extract::State,
    response::{Html, Redirect},
    Json,
};
use chrono::Local;

pub async fn index() -> Redirect {
    Redirect::to("/panel")
}

pub async fn panel(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let data = load_dashboard(&state.client, &state.panel).await?;
    Ok(Html(render_dashboard(&data, &state.panel, &now_string())))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardData>, AppError> {
    let data = load_dashboard(&state.client, &state.panel).await?;
    Ok(Json(data))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

fn now_string() -> String {
    Local::now().format("%Y-%m-%d %H:%M").to_string()
}
