use crate::api::{ApiClient, ApiError};
use crate::config::PanelSettings;
use crate::models::{DashboardData, KpiSummary, ReorderItem, SalesPoint};
use tracing::warn;

pub const KPI_PATH: &str = "/api/sales/kpi";
pub const SERIES_PATH: &str = "/api/sales/series";
pub const REORDER_PATH: &str = "/api/inventory/reorder";

pub fn series_path(days: u32) -> String {
    format!("{SERIES_PATH}?days={days}")
}

pub fn reorder_path(horizon_days: u32) -> String {
    format!("{REORDER_PATH}?h={horizon_days}")
}

/// Fetches one page worth of data, one call at a time.
///
/// The KPI summary is required and its error is returned. The series and
/// reorder lists are optional: any failure is logged and replaced by an
/// empty list.
pub async fn load_dashboard(
    client: &ApiClient,
    settings: &PanelSettings,
) -> Result<DashboardData, ApiError> {
    let kpi: KpiSummary = client.get_json(KPI_PATH, None).await?;

    let series: Vec<SalesPoint> = or_empty(
        "sales series",
        client
            .get_json(&series_path(settings.series_days), None)
            .await,
    );

    let reorder: Vec<ReorderItem> = or_empty(
        "reorder recommendations",
        client
            .get_json(&reorder_path(settings.reorder_horizon_days), None)
            .await,
    );

    Ok(DashboardData {
        kpi,
        series,
        reorder,
    })
}

/// Collapses a failed optional fetch into an empty list.
pub fn or_empty<T>(source: &str, result: Result<Vec<T>, ApiError>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(err) => {
            warn!(source, error = %err, "optional data source failed, showing empty state");
            Vec::new()
        }
    }
}
