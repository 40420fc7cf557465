//! Dumping a dataset from the source system
//!
//! Every configured route is fetched with `GET <endpoint>/<route>` and is
//! expected to answer with an array of records. The route name becomes the
//! entity name.

use futures::future::join_all;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::inference::InferenceError;
use crate::migration::FetchError;
use crate::models::Dataset;

/// Errors raised while dumping the source system
#[derive(Error, Debug)]
pub enum DumpError {
    /// A route could not be fetched
    #[error("Failed to dump route '{route}': {source}")]
    Fetch {
        route: String,
        #[source]
        source: FetchError,
    },

    /// A route answered with something that is not a list of records
    #[error(transparent)]
    Malformed(#[from] InferenceError),
}

/// HTTP client for the source system's content API
#[derive(Debug, Clone)]
pub struct SourceClient {
    /// Base URL of the source system
    endpoint: String,
    /// Request timeout in seconds
    timeout_seconds: u64,
    /// HTTP client
    client: reqwest::Client,
}

impl SourceClient {
    /// Create a client for a source base URL
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_seconds: 60,
            client: reqwest::Client::new(),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// URL of a route
    pub fn route_url(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.endpoint.trim_end_matches('/'),
            route.trim_start_matches('/')
        )
    }

    /// Fetch the JSON body of one route
    pub async fn fetch_route(&self, route: &str) -> Result<Value, FetchError> {
        let url = self.route_url(route);
        tracing::debug!("Dumping {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(std::time::Duration::from_secs(self.timeout_seconds))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(self.timeout_seconds)
                } else {
                    FetchError::ConnectionError(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::ConnectionError(e.to_string()))
    }

    /// Fetch every route concurrently and assemble a dataset in route order
    pub async fn dump(&self, routes: &[String]) -> Result<Dataset, DumpError> {
        let bodies = join_all(routes.iter().map(|route| self.fetch_route(route))).await;

        let mut raw = Map::new();
        for (route, body) in routes.iter().zip(bodies) {
            let body = body.map_err(|source| DumpError::Fetch {
                route: route.clone(),
                source,
            })?;
            raw.insert(route.clone(), body);
        }

        tracing::info!("Dumped {} route(s) from {}", routes.len(), self.endpoint);
        Ok(Dataset::from_value(Value::Object(raw))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_url() {
        let client = SourceClient::new("http://old-cms:1337/");
        assert_eq!(client.route_url("posts"), "http://old-cms:1337/posts");
        assert_eq!(client.route_url("/posts"), "http://old-cms:1337/posts");
    }

    #[tokio::test]
    async fn test_dump_unreachable_source() {
        let client = SourceClient::new("http://127.0.0.1:9").with_timeout(2);
        let err = client.dump(&["posts".to_string()]).await.unwrap_err();
        assert!(matches!(err, DumpError::Fetch { ref route, .. } if route == "posts"));
    }

    #[tokio::test]
    async fn test_dump_no_routes() {
        let dataset = SourceClient::new("http://127.0.0.1:9").dump(&[]).await.unwrap();
        assert!(dataset.is_empty());
    }
}
