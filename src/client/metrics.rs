use reqwest::Method;
use serde::Serialize;

use super::SeyrenClient;
use crate::error::{Result, SeyrenError};

/// Rendering options for a target chart
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Graphite time range, e.g. `-1day`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_thresholds: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_legend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_axes: Option<bool>,
}

impl ChartOptions {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_range(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self.to = Some(to.into());
        self
    }
}

impl SeyrenClient {
    /// Number of metrics matching a Graphite path, e.g. `host.*.cpu`
    pub async fn get_metric_count(&self, path: &str) -> Result<u64> {
        let url = self.endpoint(&["metrics", path, "total"])?;
        let response: serde_json::Map<String, serde_json::Value> =
            self.get_json(url, &[]).await?;

        let count = response.get(path).ok_or_else(|| {
            SeyrenError::MalformedResponse(format!("missing metric count for '{}'", path))
        })?;

        count.as_u64().ok_or_else(|| {
            SeyrenError::MalformedResponse(format!(
                "metric count for '{}' is not a non-negative integer: {}",
                path, count
            ))
        })
    }

    /// Chart image for a Graphite target, as returned by the server
    pub async fn get_chart_for_target(
        &self,
        target: &str,
        options: &ChartOptions,
    ) -> Result<Vec<u8>> {
        let url = self.endpoint(&["chart", target])?;
        let response = self
            .execute(self.request(Method::GET, url).query(options))
            .await?;
        Ok(response.bytes().await?.to_vec())
    }
}
