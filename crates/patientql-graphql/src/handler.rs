//! Axum HTTP handler for the GraphQL endpoint.
//!
//! The endpoint accepts any HTTP method. The document is always read from the
//! `query` URL parameter, together with optional `operationName` and
//! `variables` (a JSON-encoded string).

use async_graphql::dynamic::Schema;
use async_graphql::{Request, Response, Variables};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response as HttpResponse};
use patientql_storage::DynStorage;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::context::GraphQLContextBuilder;
use crate::error::GraphQLError;

/// Code attached to errors raised by parsing or validation, which carry no
/// extensions of their own.
pub const DEFAULT_ERROR_CODE: &str = "INVALID_QUERY";

/// State shared across GraphQL requests.
#[derive(Clone)]
pub struct GraphQLState {
    /// Executable schema.
    pub schema: Schema,

    /// Storage handle injected into every request context.
    pub storage: DynStorage,
}

impl GraphQLState {
    /// Creates handler state from a built schema and a storage handle.
    #[must_use]
    pub fn new(schema: Schema, storage: DynStorage) -> Self {
        Self { schema, storage }
    }
}

/// URL parameters accepted by the endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct GraphQLQueryParams {
    /// The GraphQL document.
    pub query: Option<String>,

    /// Optional operation name.
    #[serde(rename = "operationName")]
    pub operation_name: Option<String>,

    /// Optional variables (JSON string).
    pub variables: Option<String>,
}

/// JSON body returned for an executed request.
#[derive(Debug, Serialize)]
pub struct GraphQLResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,
}

impl From<Response> for GraphQLResponse {
    fn from(resp: Response) -> Self {
        // Field errors carry a path; parse and validation errors never do.
        // Once execution has started `data` is always present, even if null.
        let executed = resp.errors.iter().any(|e| !e.path.is_empty());
        let data_json = serde_json::to_value(&resp.data).unwrap_or(serde_json::Value::Null);
        let data = if data_json.is_null() && !executed {
            None
        } else {
            Some(data_json)
        };

        let errors = resp
            .errors
            .into_iter()
            .map(|mut e| {
                let mut extensions = e.extensions.take().unwrap_or_default();
                if extensions.get("code").is_none() {
                    extensions.set("code", DEFAULT_ERROR_CODE);
                }
                e.extensions = Some(extensions);
                serde_json::to_value(&e).unwrap_or_else(|_| {
                    serde_json::json!({
                        "message": e.message,
                        "extensions": { "code": DEFAULT_ERROR_CODE }
                    })
                })
            })
            .collect();

        Self { data, errors }
    }
}

/// Handles any request to the GraphQL path.
///
/// Executed requests always answer `200 OK`; failures are reported in the
/// `errors` array. Only a malformed `variables` parameter short-circuits with
/// `400 Bad Request`.
pub async fn graphql_handler(
    State(state): State<GraphQLState>,
    method: Method,
    headers: HeaderMap,
    Query(params): Query<GraphQLQueryParams>,
) -> HttpResponse {
    let request = match params_to_request(params) {
        Ok(req) => req,
        Err(e) => {
            warn!(error = %e, "Rejecting GraphQL request with malformed variables");
            return error_response(GraphQLError::InvalidRequest(format!(
                "variables is not valid JSON: {e}"
            )))
            .into_response();
        }
    };

    // Extract request ID from headers (set by middleware)
    let request_id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let context = match GraphQLContextBuilder::new()
        .with_storage(state.storage.clone())
        .with_request_id(request_id.clone())
        .build()
    {
        Ok(ctx) => ctx,
        Err(e) => {
            return error_response(GraphQLError::Internal(e.to_string())).into_response();
        }
    };

    debug!(%method, request_id = %request_id, "Executing GraphQL query");
    let response = state.schema.execute(request.data(context)).await;

    if response.is_err() {
        debug!(
            request_id = %request_id,
            errors = response.errors.len(),
            "GraphQL query finished with errors"
        );
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(GraphQLResponse::from(response)),
    )
        .into_response()
}

/// Converts URL parameters to a GraphQL request.
///
/// A missing `query` becomes the empty document, which fails to parse and is
/// reported in `errors` like any other bad document.
pub fn params_to_request(params: GraphQLQueryParams) -> Result<Request, serde_json::Error> {
    let mut request = Request::new(params.query.unwrap_or_default());

    if let Some(op_name) = params.operation_name {
        request = request.operation_name(op_name);
    }

    if let Some(vars_str) = params.variables {
        let vars: serde_json::Value = serde_json::from_str(&vars_str)?;
        request = request.variables(Variables::from_json(vars));
    }

    Ok(request)
}

/// Returns an error response for failures outside execution.
fn error_response(error: GraphQLError) -> impl IntoResponse {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let body = serde_json::json!({
        "errors": [{
            "message": error.to_string(),
            "extensions": {
                "code": error.error_code(),
            }
        }]
    });

    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
}
