//! Outbound SPARQL protocol client.

use crate::sparql::SparqlResults;
use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::ACCEPT;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://dbpedia.org/sparql";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to execute request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to read response: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl QueryError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, QueryError::Transport(e) if e.is_timeout())
    }
}

/// Anything that can answer a SPARQL query with a results document.
#[async_trait]
pub trait SparqlClient: Send + Sync {
    async fn query(&self, sparql: &str) -> Result<SparqlResults, QueryError>;
}

/// [`SparqlClient`] talking to a remote endpoint over the SPARQL protocol
/// (GET with `query` and `format=json` parameters).
#[derive(Debug, Clone)]
pub struct DbpediaClient {
    endpoint: Url,
    http: reqwest::Client,
}

impl DbpediaClient {
    pub fn new(endpoint: Url) -> Result<Self, QueryError> {
        Self::with_timeout(endpoint, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(QueryError::Client)?;
        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SparqlClient for DbpediaClient {
    async fn query(&self, sparql: &str) -> Result<SparqlResults, QueryError> {
        let started = Instant::now();
        debug!(endpoint = %self.endpoint, query_len = sparql.len(), "sending SPARQL query");

        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("query", sparql), ("format", "json")])
            .header(ACCEPT, SPARQL_RESULTS_JSON)
            .send()
            .await
            .map_err(|e| {
                warn!(endpoint = %self.endpoint, error = %e, timeout = e.is_timeout(), "SPARQL request failed");
                QueryError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(endpoint = %self.endpoint, error = %e, "failed to read error body");
                    String::new()
                }
            };
            warn!(endpoint = %self.endpoint, status = status.as_u16(), "endpoint rejected query");
            return Err(QueryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(QueryError::Body)?;
        let results: SparqlResults = serde_json::from_str(&body)?;

        debug!(
            endpoint = %self.endpoint,
            rows = results.row_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "SPARQL query answered"
        );
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_mentions_code_and_body() {
        let err = QueryError::Status {
            status: 503,
            body: "Service Unavailable".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "endpoint returned status 503: Service Unavailable"
        );
        assert!(!err.is_timeout());
    }

    #[test]
    fn user_agent_identifies_the_proxy() {
        assert!(USER_AGENT.starts_with("dbpedia-sparql-proxy/"));
    }

    #[tokio::test]
    async fn slow_endpoint_times_out_as_query_failed() {
        use crate::error::ApiError;
        use crate::handlers::AppState;
        use crate::server::build_router;
        use crate::sparql::QueryValidator;
        use axum::{
            Router,
            body::Body,
            http::{Request, StatusCode},
            routing::get,
        };
        use http_body_util::BodyExt;
        use std::sync::Arc;
        use tower::ServiceExt;

        let stub = Router::new().route(
            "/sparql",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                "{}"
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(axum::serve(listener, stub).into_future());

        let endpoint: Url = format!("http://{addr}/sparql").parse().unwrap();
        let client = DbpediaClient::with_timeout(endpoint, Duration::from_millis(100)).unwrap();

        let err = client.query("ASK { ?s ?p ?o }").await.unwrap_err();
        assert!(matches!(err, QueryError::Transport(_)), "{err:?}");
        assert!(err.is_timeout());
        assert_eq!(
            ApiError::from(err).code().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let router = build_router(AppState::new(Arc::new(client), QueryValidator::default()));
        let response = router
            .oneshot(
                Request::post("/api/v1/sparql")
                    .body(Body::from(r#"{"query":"ASK { ?s ?p ?o }"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "query_failed");
    }

    #[test]
    fn timeout_defaults_to_thirty_seconds() {
        assert_eq!(REQUEST_TIMEOUT, Duration::from_secs(30));
    }

    #[test]
    fn client_keeps_its_endpoint() {
        let endpoint: Url = DEFAULT_ENDPOINT.parse().unwrap();
        let client = DbpediaClient::new(endpoint.clone()).unwrap();
        assert_eq!(client.endpoint(), &endpoint);
    }
}
