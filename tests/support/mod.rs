#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use dbpedia_sparql_proxy::sparql::{Binding, Head, QueryValidator, Results, SparqlResults};
use dbpedia_sparql_proxy::{AppState, QueryError, SparqlClient, build_router};
use http_body_util::BodyExt;
use indexmap::IndexMap;
use serde_json::Value;
use tower::ServiceExt;

/// Answers every query with the same document and counts the calls.
pub struct FixedClient {
    results: SparqlResults,
    calls: AtomicUsize,
}

impl FixedClient {
    pub fn new(results: SparqlResults) -> Arc<Self> {
        Arc::new(Self {
            results,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SparqlClient for FixedClient {
    async fn query(&self, _sparql: &str) -> Result<SparqlResults, QueryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.clone())
    }
}

/// Fails every query as if the endpoint answered with the given status.
pub struct RejectingClient {
    pub status: u16,
    pub body: &'static str,
}

#[async_trait]
impl SparqlClient for RejectingClient {
    async fn query(&self, _sparql: &str) -> Result<SparqlResults, QueryError> {
        Err(QueryError::Status {
            status: self.status,
            body: self.body.to_string(),
        })
    }
}

pub fn berlin_results() -> SparqlResults {
    let mut row = IndexMap::new();
    row.insert(
        "city".to_string(),
        Binding {
            kind: "uri".to_string(),
            value: "http://dbpedia.org/resource/Berlin".to_string(),
            lang: None,
            datatype: None,
        },
    );
    row.insert(
        "label".to_string(),
        Binding {
            kind: "literal".to_string(),
            value: "Berlin".to_string(),
            lang: Some("en".to_string()),
            datatype: None,
        },
    );
    SparqlResults {
        head: Head {
            link: vec![],
            vars: vec!["city".to_string(), "label".to_string()],
        },
        results: Results {
            bindings: vec![row],
            distinct: false,
            ordered: true,
        },
        boolean: None,
    }
}

pub fn router_with(client: Arc<dyn SparqlClient>) -> Router {
    build_router(AppState::new(client, QueryValidator::default()))
}

pub fn router_with_validator(client: Arc<dyn SparqlClient>, validator: QueryValidator) -> Router {
    build_router(AppState::new(client, validator))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is JSON")
    }
}

pub async fn send(router: Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_owned())).unwrap_or_else(Body::empty))
        .expect("request");

    let response = router.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes()
        .to_vec();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn post_json(router: Router, uri: &str, body: &str) -> TestResponse {
    send(router, Method::POST, uri, Some(body)).await
}

pub async fn get(router: Router, uri: &str) -> TestResponse {
    send(router, Method::GET, uri, None).await
}
