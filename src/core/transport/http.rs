//! HTTP transport implementation.
//!
//! JSON-RPC 2.0 over POST for clients that cannot spawn a stdio process.
//! Tool requests go through the same [`Dispatcher`](crate::domains::tools::Dispatcher)
//! as the stdio path, so validation and error codes are identical.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rmcp::model::{ErrorCode, JsonObject};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::domains::tools::Invocation;

const PROTOCOL_VERSION: &str = "2024-11-05";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: code.0,
                message: message.into(),
            }),
        }
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the axum router for this transport.
    pub fn router(&self, server: McpServer) -> Router {
        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(server);

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }
        app
    }

    /// Serve until Ctrl-C.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (JSON-RPC at POST {})", addr, self.config.rpc_path);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupt received, shutting down HTTP transport");
                }
            })
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

async fn root_handler(State(server): State<McpServer>) -> impl IntoResponse {
    Json(json!({
        "name": server.name(),
        "version": server.version(),
        "transport": "HTTP",
        "protocol": "JSON-RPC 2.0",
        "tools": server.dispatcher().registry().tool_names(),
    }))
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(server): State<McpServer>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    tracing::Span::current().record("method", request.method.as_str());
    match process_request(&server, request).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Process a JSON-RPC message. Notifications produce no response.
pub async fn process_request(
    server: &McpServer,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::error(
            request.id,
            ErrorCode::INVALID_REQUEST,
            "Invalid Request",
        ));
    }

    if request.method.starts_with("notifications/") {
        info!("Received notification: {}", request.method);
        return None;
    }

    let response = match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            request.id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": server.name(),
                    "version": server.version()
                }
            }),
        ),
        "tools/list" => JsonRpcResponse::success(
            request.id,
            json!({ "tools": server.dispatcher().list_tools() }),
        ),
        "tools/call" => handle_tools_call(server, request).await,
        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::error(request.id, ErrorCode::METHOD_NOT_FOUND, "Method not found")
        }
    };
    Some(response)
}

async fn handle_tools_call(server: &McpServer, request: JsonRpcRequest) -> JsonRpcResponse {
    let params = request.params.unwrap_or(Value::Null);

    let Some(name) = params.get("name").and_then(Value::as_str) else {
        return JsonRpcResponse::error(request.id, ErrorCode::INVALID_PARAMS, "Missing tool name");
    };

    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => JsonObject::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => {
            return JsonRpcResponse::error(
                request.id,
                ErrorCode::INVALID_PARAMS,
                "arguments must be an object",
            );
        }
    };

    match server
        .dispatcher()
        .dispatch(Invocation::new(name, arguments))
        .await
    {
        Ok(result) => match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(request.id, ErrorCode::INTERNAL_ERROR, e.to_string()),
        },
        Err(e) => JsonRpcResponse::error(request.id, e.code(), e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    fn server() -> McpServer {
        McpServer::new(Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_tools_list_in_registration_order() {
        let response = process_request(&server(), request("tools/list", json!({}))).await.unwrap();
        let tools = response.result.unwrap()["tools"].clone();
        let names: Vec<_> = tools
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["generate_diff", "search_docs", "get_page"]);
    }

    #[tokio::test]
    async fn test_unknown_tool_maps_to_method_not_found() {
        let response = process_request(
            &server(),
            request("tools/call", json!({ "name": "nope", "arguments": {} })),
        )
        .await.unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, ErrorCode::METHOD_NOT_FOUND.0);
        assert!(error.message.contains("nope"));
    }

    #[tokio::test]
    async fn test_missing_argument_maps_to_invalid_params() {
        let response = process_request(
            &server(),
            request("tools/call", json!({ "name": "search_docs", "arguments": {} })),
        )
        .await.unwrap();
        assert_eq!(response.error.unwrap().code, ErrorCode::INVALID_PARAMS.0);
    }

    #[tokio::test]
    async fn test_non_object_arguments_rejected() {
        let response = process_request(
            &server(),
            request("tools/call", json!({ "name": "search_docs", "arguments": [1] })),
        )
        .await.unwrap();
        assert_eq!(response.error.unwrap().code, ErrorCode::INVALID_PARAMS.0);
    }

    #[tokio::test]
    async fn test_bad_version_and_unknown_method() {
        let mut bad = request("tools/list", json!({}));
        bad.jsonrpc = "1.0".to_string();
        let response = process_request(&server(), bad).await.unwrap();
        assert_eq!(response.error.unwrap().code, ErrorCode::INVALID_REQUEST.0);

        let response = process_request(&server(), request("prompts/list", json!({}))).await.unwrap();
        assert_eq!(response.error.unwrap().code, ErrorCode::METHOD_NOT_FOUND.0);
    }

    #[tokio::test]
    async fn test_initialize_reports_tools_capability() {
        let response = process_request(&server(), request("initialize", json!({}))).await.unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "docs-diff-mcp-server");
    }

    #[tokio::test]
    async fn test_notification_gets_empty_accepted() {
        let notification = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: None,
            method: "notifications/initialized".to_string(),
            params: None,
        };
        assert!(process_request(&server(), notification.clone()).await.is_none());

        let response = handle_rpc(State(server()), Json(notification)).await;
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());
    }
}
