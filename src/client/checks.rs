use reqwest::Method;
use serde::Deserialize;

use super::{created_id, decode, SeyrenClient};
use crate::error::{Result, SeyrenError};
use crate::model::{Check, CheckFilter, NewCheck, Subscription};

#[derive(Debug, Deserialize)]
struct ChecksResponse {
    #[serde(default)]
    values: Vec<serde_json::Value>,
}

impl SeyrenClient {
    /// Checks matching `filter`
    pub async fn get_checks(&self, filter: &CheckFilter) -> Result<Vec<Check>> {
        let url = self.endpoint(&["checks"])?;
        let response: ChecksResponse = self.get_json(url, &filter.query()).await?;
        response.values.iter().map(Check::from_value).collect()
    }

    pub async fn get_check(&self, check_id: &str) -> Result<Check> {
        let url = self.endpoint(&["checks", check_id])?;
        let response = self
            .execute(self.request(Method::GET, url))
            .await
            .map_err(|e| e.for_check(check_id, "get"))?;
        let raw: serde_json::Value = decode(response).await?;
        Check::from_value(&raw)
    }

    /// Create a check, returning the new id when the server reports one
    pub async fn create_check(&self, check: &NewCheck) -> Result<Option<String>> {
        let url = self.endpoint(&["checks"])?;
        let response = self
            .execute(self.request(Method::POST, url).json(check))
            .await
            .map_err(|e| e.for_check(&check.name, "create"))?;

        let id = created_id(&response);
        tracing::debug!(name = %check.name, id = ?id, "Check created");
        Ok(id)
    }

    pub async fn update_check(&self, check: &Check) -> Result<()> {
        let check_id = check.require_id()?;
        let url = self.endpoint(&["checks", check_id])?;
        self.execute(self.request(Method::PUT, url).json(check))
            .await
            .map(|_| ())
            .map_err(|e| e.for_check(check_id, "update"))
    }

    pub async fn delete_check(&self, check_id: &str) -> Result<()> {
        let url = self.endpoint(&["checks", check_id])?;
        self.execute(self.request(Method::DELETE, url))
            .await
            .map(|_| ())
            .map_err(|e| e.for_check(check_id, "delete"))
    }

    /// Attach a subscription to a check, returning its id when reported
    pub async fn create_subscription(
        &self,
        check_id: &str,
        subscription: &Subscription,
    ) -> Result<Option<String>> {
        let url = self.endpoint(&["checks", check_id, "subscriptions"])?;
        let response = self
            .execute(self.request(Method::POST, url).json(subscription))
            .await
            .map_err(|e| e.for_check(check_id, "create subscription"))?;
        Ok(created_id(&response))
    }

    pub async fn update_subscription(
        &self,
        check_id: &str,
        subscription: &Subscription,
    ) -> Result<()> {
        let subscription_id = subscription_id(check_id, subscription)?;
        let url = self.endpoint(&["checks", check_id, "subscriptions", subscription_id])?;
        self.execute(self.request(Method::PUT, url).json(subscription))
            .await
            .map(|_| ())
            .map_err(|e| e.for_check(check_id, "update subscription"))
    }

    pub async fn delete_subscription(
        &self,
        check_id: &str,
        subscription: &Subscription,
    ) -> Result<()> {
        let subscription_id = subscription_id(check_id, subscription)?;
        let url = self.endpoint(&["checks", check_id, "subscriptions", subscription_id])?;
        self.execute(self.request(Method::DELETE, url))
            .await
            .map(|_| ())
            .map_err(|e| e.for_check(check_id, "delete subscription"))
    }

    /// Have the server fire a test notification through a subscription
    pub async fn test_subscription(
        &self,
        check_id: &str,
        subscription: &Subscription,
    ) -> Result<()> {
        let subscription_id = subscription_id(check_id, subscription)?;
        let url = self.endpoint(&[
            "checks",
            check_id,
            "subscriptions",
            subscription_id,
            "test",
        ])?;
        self.execute(self.request(Method::PUT, url))
            .await
            .map(|_| ())
            .map_err(|e| e.for_check(check_id, "test subscription"))
    }
}

fn subscription_id<'a>(check_id: &str, subscription: &'a Subscription) -> Result<&'a str> {
    subscription.id().ok_or_else(|| {
        SeyrenError::check(format!("subscription of check {} has no id", check_id))
    })
}

#[cfg(test)]
mod tests {
    use super::super::testing::{serve_created, serve_fixed, serve_recording, Calls};
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;
    use serde_json::json;

    fn check() -> Check {
        Check::from_value(&json!({
            "id": "5f3e2a",
            "target": "host.cpu.load",
            "warn": "80",
            "error": "90"
        }))
        .unwrap()
    }

    fn subscription(id: Option<&str>) -> Subscription {
        let mut raw = json!({
            "target": "ops@example.com",
            "type": "EMAIL",
            "fromTime": "0800",
            "toTime": "1800",
            "enabled": true
        });
        if let Some(id) = id {
            raw["id"] = json!(id);
        }
        Subscription::from_value(&raw).unwrap()
    }

    fn assert_single_call(calls: &Calls, method: &str, path: &str) {
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1, "expected exactly one request");
        assert_eq!(calls[0].method, method);
        assert_eq!(calls[0].path, path);
    }

    #[tokio::test]
    async fn test_get_checks_with_filter() {
        let (url, calls) = serve_recording(
            StatusCode::OK,
            json!({
                "values": [
                    {"id": "aa", "target": "a.b", "name": "first", "state": "OK"},
                    {"id": "bb", "target": "c.d", "name": "second", "state": "ERROR"}
                ],
                "items": 2, "start": 0, "total": 2
            }),
        )
        .await;
        let client = SeyrenClient::new(&url).unwrap();

        let filter = CheckFilter::default().with_state("ERROR").with_enabled(true);
        let checks = client.get_checks(&filter).await.unwrap();

        let ids: Vec<_> = checks.iter().filter_map(Check::id).collect();
        assert_eq!(ids, vec!["aa", "bb"]);

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].path, "/api/checks");
        assert_eq!(calls[0].query.as_deref(), Some("state=ERROR&enabled=true"));
    }

    #[tokio::test]
    async fn test_get_checks_invalid_entry() {
        let (url, _) = serve_recording(
            StatusCode::OK,
            json!({"values": [{"id": "aa"}, {"id": "NOT-HEX"}]}),
        )
        .await;
        let client = SeyrenClient::new(&url).unwrap();

        let err = client.get_checks(&CheckFilter::default()).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_get_check() {
        let (url, calls) = serve_recording(
            StatusCode::OK,
            json!({"id": "5f3e2a", "target": "host.cpu.load", "warn": "80", "error": "90"}),
        )
        .await;
        let client = SeyrenClient::new(&url).unwrap();

        let check = client.get_check("5f3e2a").await.unwrap();
        assert_eq!(check.target(), Some("host.cpu.load"));
        assert_single_call(&calls, "GET", "/api/checks/5f3e2a");
    }

    #[tokio::test]
    async fn test_get_missing_check() {
        let (url, _) = serve_fixed(StatusCode::NOT_FOUND, "").await;
        let client = SeyrenClient::new(&url).unwrap();

        let err = client.get_check("5f3e2a").await.unwrap_err();
        assert!(matches!(err, SeyrenError::Check { status: Some(404), .. }));
    }

    #[tokio::test]
    async fn test_create_check() {
        let (url, calls) = serve_created("/api/checks/77aa").await;
        let client = SeyrenClient::new(&url).unwrap();

        let new_check = NewCheck::new("cpu", "host.cpu.load", "80", "90");
        let id = Check::create(&client, &new_check).await.unwrap();

        assert_eq!(id.as_deref(), Some("77aa"));
        assert_single_call(&calls, "POST", "/api/checks");
        assert_eq!(
            calls.lock().unwrap()[0].json(),
            serde_json::to_value(&new_check).unwrap()
        );
    }

    #[tokio::test]
    async fn test_update_check_sends_record() {
        let (url, calls) = serve_recording(StatusCode::OK, json!({})).await;
        let client = SeyrenClient::new(&url).unwrap();

        let mut check = check();
        check.set("warn", "85").unwrap();
        check.update(&client).await.unwrap();

        assert_single_call(&calls, "PUT", "/api/checks/5f3e2a");
        assert_eq!(
            calls.lock().unwrap()[0].json(),
            json!({"id": "5f3e2a", "target": "host.cpu.load", "warn": "85", "error": "90"})
        );
    }

    #[tokio::test]
    async fn test_delete_check() {
        let (url, calls) = serve_fixed(StatusCode::NO_CONTENT, "").await;
        let client = SeyrenClient::new(&url).unwrap();

        check().delete(&client).await.unwrap();
        assert_single_call(&calls, "DELETE", "/api/checks/5f3e2a");
    }

    #[tokio::test]
    async fn test_check_operations_fail_on_server_error() {
        let (url, _) = serve_fixed(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;
        let client = SeyrenClient::new(&url).unwrap();
        let check = check();

        let err = check.update(&client).await.unwrap_err();
        assert!(matches!(err, SeyrenError::Check { status: Some(500), .. }));

        let err = check.delete(&client).await.unwrap_err();
        assert!(matches!(err, SeyrenError::Check { status: Some(500), .. }));

        let err = check.delete_alerts(&client, Utc::now()).await.unwrap_err();
        assert!(matches!(err, SeyrenError::Alert { status: Some(500), .. }));
    }

    #[tokio::test]
    async fn test_check_without_id_sends_nothing() {
        let (url, calls) = serve_recording(StatusCode::OK, json!({})).await;
        let client = SeyrenClient::new(&url).unwrap();
        let mut check = check();
        check.clear("id").unwrap();

        assert!(matches!(check.delete(&client).await, Err(SeyrenError::Check { .. })));
        assert!(matches!(check.update(&client).await, Err(SeyrenError::Check { .. })));
        assert!(matches!(check.get_alerts(&client).await, Err(SeyrenError::Check { .. })));
        assert!(matches!(
            check.create_subscription(&client, &subscription(None)).await,
            Err(SeyrenError::Check { .. })
        ));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_subscription() {
        let (url, calls) = serve_created("/api/checks/5f3e2a/subscriptions/99cc").await;
        let client = SeyrenClient::new(&url).unwrap();

        let id = check()
            .create_subscription(&client, &subscription(None))
            .await
            .unwrap();

        assert_eq!(id.as_deref(), Some("99cc"));
        assert_single_call(&calls, "POST", "/api/checks/5f3e2a/subscriptions");
        assert_eq!(calls.lock().unwrap()[0].json()["fromTime"], json!("0800"));
    }

    #[tokio::test]
    async fn test_update_subscription() {
        let (url, calls) = serve_recording(StatusCode::OK, json!({})).await;
        let client = SeyrenClient::new(&url).unwrap();

        check()
            .update_subscription(&client, &subscription(Some("99cc")))
            .await
            .unwrap();
        assert_single_call(&calls, "PUT", "/api/checks/5f3e2a/subscriptions/99cc");
    }

    #[tokio::test]
    async fn test_delete_subscription() {
        let (url, calls) = serve_fixed(StatusCode::NO_CONTENT, "").await;
        let client = SeyrenClient::new(&url).unwrap();

        check()
            .delete_subscription(&client, &subscription(Some("99cc")))
            .await
            .unwrap();
        assert_single_call(&calls, "DELETE", "/api/checks/5f3e2a/subscriptions/99cc");
    }

    #[tokio::test]
    async fn test_test_subscription() {
        let (url, calls) = serve_fixed(StatusCode::NO_CONTENT, "").await;
        let client = SeyrenClient::new(&url).unwrap();

        check()
            .test_subscription(&client, &subscription(Some("99cc")))
            .await
            .unwrap();
        assert_single_call(&calls, "PUT", "/api/checks/5f3e2a/subscriptions/99cc/test");
    }

    #[tokio::test]
    async fn test_subscription_without_id() {
        let (url, calls) = serve_recording(StatusCode::OK, json!({})).await;
        let client = SeyrenClient::new(&url).unwrap();

        let err = check()
            .test_subscription(&client, &subscription(None))
            .await
            .unwrap_err();
        assert!(matches!(err, SeyrenError::Check { .. }));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_subscription_failure_is_check_error() {
        let (url, _) = serve_fixed(StatusCode::CONFLICT, "duplicate").await;
        let client = SeyrenClient::new(&url).unwrap();

        let err = check()
            .create_subscription(&client, &subscription(None))
            .await
            .unwrap_err();
        assert!(matches!(err, SeyrenError::Check { status: Some(409), .. }));
    }
}
