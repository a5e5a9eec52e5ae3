use serde::{Deserialize, Serialize};

/// Headline figures for the selected period. Every field may be missing or
/// `null` on the wire and is shown as 0 in that case.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct KpiSummary {
    #[serde(default, alias = "ingresos_neto")]
    pub net_revenue: Option<f64>,
    #[serde(default, alias = "cogs_neto")]
    pub net_cogs: Option<f64>,
    #[serde(default, alias = "margen_bruto")]
    pub gross_margin: Option<f64>,
    #[serde(default, alias = "gastos_neto")]
    pub net_expenses: Option<f64>,
    #[serde(default, alias = "beneficio_neto")]
    pub net_profit: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesPoint {
    pub date: String,
    #[serde(default, alias = "ingresos", deserialize_with = "null_as_zero")]
    pub revenue: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub cogs: f64,
    #[serde(
        default,
        alias = "margen",
        alias = "margen_bruto",
        deserialize_with = "null_as_zero"
    )]
    pub margin: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReorderItem {
    pub product_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "demand_h", deserialize_with = "null_as_zero")]
    pub demand_over_horizon: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub stock_on_hand: i64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub lead_time_days: i64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub safety_stock: i64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub reorder_qty: i64,
}

impl ReorderItem {
    /// Label used in charts and tables; blank names fall back to the product id.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.product_id,
        }
    }
}

/// Everything a single dashboard render pulled from the backend.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DashboardData {
    pub kpi: KpiSummary,
    pub series: Vec<SalesPoint>,
    pub reorder: Vec<ReorderItem>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Whole-unit quantities: `null` reads as 0 and floats are rounded.
fn lenient_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    Ok(if value.is_finite() { value.round() as i64 } else { 0 })
}
