use kuy_dashboard_core::Entity;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BackendError;
use crate::http::ApiClient;

/// Dashboard overview endpoint.
pub const DASHBOARD_PATH: &str = "/api/dashboard/data";

/// One bar of the monthly overview chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewPoint {
    #[serde(default)]
    pub month: String,
    #[serde(default)]
    pub total_per_month: f64,
}

/// Totals and latest transactions shown on the dashboard home page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_daur_ulang: f64,
    #[serde(default)]
    pub total_penjemputan: f64,
    #[serde(default)]
    pub total_pengantaran: f64,
    #[serde(default)]
    pub total_pengguna: f64,
    #[serde(default)]
    pub transactions: Vec<Entity>,
    #[serde(default)]
    pub overview: Vec<OverviewPoint>,
}

impl DashboardSummary {
    /// `(label, value)` pairs of the four totals, in page order.
    pub fn totals(&self) -> [(&'static str, f64); 4] {
        [
            ("Total Daur Ulang", self.total_daur_ulang),
            ("Total Penjemputan", self.total_penjemputan),
            ("Total Pengantaran", self.total_pengantaran),
            ("Total Pengguna", self.total_pengguna),
        ]
    }
}

fn as_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `amount × price_per_kg`, or `0` when either is not numeric.
pub fn transaction_total(transaction: &Entity) -> f64 {
    match (
        as_number(transaction.get("amount")),
        as_number(transaction.get("price_per_kg")),
    ) {
        (Some(amount), Some(price)) => amount * price,
        _ => 0.0,
    }
}

impl ApiClient {
    pub async fn dashboard(&self) -> Result<DashboardSummary, BackendError> {
        let summary: DashboardSummary = self.get_json(DASHBOARD_PATH).await?;
        tracing::debug!(
            transactions = summary.transactions.len(),
            overview = summary.overview.len(),
            "dashboard loaded"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_partial_summary() {
        let summary: DashboardSummary = serde_json::from_value(json!({
            "totalDaurUlang": 120.5,
            "totalPengguna": 42,
            "transactions": [{"name": "Agus", "amount": "3", "price_per_kg": 2000}],
            "overview": [{"month": "Jan", "total_per_month": 10}]
        }))
        .unwrap();
        assert_eq!(summary.total_daur_ulang, 120.5);
        assert_eq!(summary.total_penjemputan, 0.0);
        assert_eq!(summary.transactions.len(), 1);
        assert_eq!(summary.overview[0].month, "Jan");
        assert_eq!(summary.totals()[3], ("Total Pengguna", 42.0));
    }

    #[test]
    fn transaction_totals() {
        let t = |v: Value| Entity::from_value(v).unwrap();
        assert_eq!(
            transaction_total(&t(json!({"amount": "3", "price_per_kg": 2000}))),
            6000.0
        );
        assert_eq!(
            transaction_total(&t(json!({"amount": "tiga", "price_per_kg": 2000}))),
            0.0
        );
        assert_eq!(transaction_total(&t(json!({}))), 0.0);
    }
}
