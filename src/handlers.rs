use crate::client::SparqlClient;
use crate::error::ApiError;
use crate::sparql::{EXAMPLE_QUERIES, ExampleQuery, QueryValidator, SparqlResults};
use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, Request, State},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Shared, immutable per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    client: Arc<dyn SparqlClient>,
    validator: QueryValidator,
}

impl AppState {
    pub fn new(client: Arc<dyn SparqlClient>, validator: QueryValidator) -> Self {
        Self { client, validator }
    }
}

/// Body accepted by the execute and validate endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Decodes the body as JSON whatever the declared content type is. An absent
/// or empty `query` is rejected like a malformed body.
impl<S> FromRequest<S> for QueryRequest
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::InvalidRequest(e.body_text()))?;
        let request: QueryRequest = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        if request.query.is_empty() {
            return Err(ApiError::InvalidRequest("query is empty".to_string()));
        }
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExamplesResponse {
    pub examples: &'static [ExampleQuery],
}

/// Validates the query, then forwards it to the configured endpoint.
pub async fn execute_query(
    State(state): State<AppState>,
    request: QueryRequest,
) -> Result<Json<SparqlResults>, ApiError> {
    let form = state.validator.validate(&request.query)?;
    debug!(query.form = %form, query_len = request.query.len(), "executing query");

    let results = state.client.query(&request.query).await?;
    Ok(Json(results))
}

/// Reports whether the query passes validation. Never contacts the endpoint.
pub async fn validate_query(
    State(state): State<AppState>,
    request: QueryRequest,
) -> Json<ValidateResponse> {
    let response = match state.validator.validate(&request.query) {
        Ok(_) => ValidateResponse {
            valid: true,
            message: "Query is valid".to_string(),
        },
        Err(e) => ValidateResponse {
            valid: false,
            message: e.to_string(),
        },
    };
    Json(response)
}

pub async fn list_examples() -> Json<ExamplesResponse> {
    Json(ExamplesResponse {
        examples: EXAMPLE_QUERIES,
    })
}
