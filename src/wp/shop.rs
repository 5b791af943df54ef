//! WooCommerce endpoints and the list-pagination envelope.

use serde_json::{json, Value};

use crate::error::{BridgeError, Result};

use super::client::ListTotals;
use super::WpClient;

impl WpClient {
    /// List shop products with the pagination envelope.
    pub async fn get_products(&self, filters: Option<&Value>) -> Result<Value> {
        let (data, totals) = self
            .get_with_totals(&self.wc_url("/products"), filters)
            .await?;
        Ok(paginate(data, totals, filters))
    }

    /// List shop orders with the pagination envelope.
    pub async fn get_orders(&self, filters: Option<&Value>) -> Result<Value> {
        let (data, totals) = self
            .get_with_totals(&self.wc_url("/orders"), filters)
            .await?;
        Ok(paginate(data, totals, filters))
    }

    /// Sales report, returned as the endpoint sends it.
    pub async fn get_sales(&self, filters: Option<&Value>) -> Result<Value> {
        self.get(&self.wc_url("/reports/sales"), filters).await
    }
}

/// Accept filters either as an object or as a JSON-encoded string.
pub fn parse_filters(filters: Option<&Value>) -> Result<Option<Value>> {
    match filters {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => serde_json::from_str(raw)
            .map(Some)
            .map_err(|e| BridgeError::InvalidFilters(e.to_string())),
        Some(other) => Ok(Some(other.clone())),
    }
}

/// Wrap a list response with the totals the endpoint reported, echoing
/// the requested page and page size back to the caller.
fn paginate(data: Value, totals: ListTotals, filters: Option<&Value>) -> Value {
    let filter_i64 =
        |key: &str, fallback: i64| filters.and_then(|f| f.get(key)).and_then(Value::as_i64).unwrap_or(fallback);

    json!({
        "data": data,
        "pagination": {
            "total": totals.total,
            "totalPages": totals.total_pages,
            "currentPage": filter_i64("page", 1),
            "perPage": filter_i64("per_page", 10),
        }
    })
}
