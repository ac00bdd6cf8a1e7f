use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Where a family's snapshots come from
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the current snapshot document
    async fn fetch(&self) -> Result<Value>;

    /// Human-readable origin, for logs
    fn describe(&self) -> String;
}

/// Snapshot source that GETs a JSON document over HTTP.
pub struct HttpSnapshotSource {
    url: String,
    http_client: Client,
}

impl HttpSnapshotSource {
    /// Create a source with no request timeout.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, None)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent("floorwatch/0.1");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            url: url.into(),
            http_client,
        })
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self) -> Result<Value> {
        let response = self
            .http_client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send snapshot request to {}", self.url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            anyhow::bail!("Snapshot endpoint returned error status {}: {}", status, body);
        }

        response
            .json::<Value>()
            .await
            .context("Failed to parse snapshot response")
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/robots")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"RobotName": "R1", "JerseyNumber": 1}]"#)
            .create_async()
            .await;

        let source = HttpSnapshotSource::new(format!("{}/robots", server.url())).unwrap();
        let document = source.fetch().await.unwrap();

        let robots = document.as_array().unwrap();
        assert_eq!(robots.len(), 1);
        assert_eq!(robots[0]["RobotName"], "R1");
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/machines")
            .with_status(503)
            .with_body("simulation not running")
            .create_async()
            .await;

        let source = HttpSnapshotSource::new(format!("{}/machines", server.url())).unwrap();
        let err = source.fetch().await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("simulation not running"));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/zones")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[{\"ZoneId\": 1")
            .create_async()
            .await;

        let source = HttpSnapshotSource::with_timeout(
            format!("{}/zones", server.url()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        let err = source.fetch().await.unwrap_err();

        assert!(err.to_string().contains("Failed to parse snapshot response"));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let source = HttpSnapshotSource::new("http://127.0.0.1:1/robots").unwrap();
        let err = source.fetch().await.unwrap_err();

        assert!(err.to_string().contains("Failed to send snapshot request"));
    }
}
