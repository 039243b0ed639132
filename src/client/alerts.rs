use chrono::{DateTime, Utc};
use reqwest::{Method, Url};

use super::paginate::{self, Page};
use super::SeyrenClient;
use crate::error::Result;
use crate::model::Alert;

impl SeyrenClient {
    /// Every alert from `start` onwards, fetched `items` at a time
    pub async fn get_alerts(&self, start: u64, items: u64) -> Result<Vec<Alert>> {
        let url = self.endpoint(&["alerts"])?;
        paginate::fetch_all(
            start,
            items,
            |start, items| self.alert_page(url.clone(), start, items),
            Alert::from_value,
        )
        .await
    }

    /// Every alert raised by one check
    pub async fn get_check_alerts(
        &self,
        check_id: &str,
        start: u64,
        items: u64,
    ) -> Result<Vec<Alert>> {
        let url = self.endpoint(&["checks", check_id, "alerts"])?;
        paginate::fetch_all(
            start,
            items,
            |start, items| self.alert_page(url.clone(), start, items),
            Alert::from_value,
        )
        .await
        .map_err(|e| e.for_alerts(check_id, "get alerts"))
    }

    /// Delete a check's alerts raised before `before`
    pub async fn delete_check_alerts(&self, check_id: &str, before: DateTime<Utc>) -> Result<()> {
        let url = self.endpoint(&["checks", check_id, "alerts"])?;
        let request = self
            .request(Method::DELETE, url)
            .query(&[("before", before.timestamp_millis().to_string())]);

        self.execute(request)
            .await
            .map(|_| ())
            .map_err(|e| e.for_alerts(check_id, "delete alerts"))
    }

    async fn alert_page(
        &self,
        url: Url,
        start: u64,
        items: u64,
    ) -> Result<Page<serde_json::Value>> {
        self.get_json(
            url,
            &[("start", start.to_string()), ("items", items.to_string())],
        )
        .await
    }
}
