//! STDIO transport implementation.
//!
//! Standard input/output transport for MCP - the default and recommended mode.
//! Ctrl-C cancels the running service, which abandons in-flight tool calls.

use rmcp::ServiceExt;
use tracing::{info, warn};

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Run the STDIO transport.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("Ready - communicating via stdin/stdout");

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        let cancel = service.cancellation_token();
        let waiting = service.waiting();
        tokio::pin!(waiting);

        let quit = tokio::select! {
            result = &mut waiting => result,
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupt received, cancelling in-flight requests");
                cancel.cancel();
                waiting.await
            }
        };

        let reason = quit.map_err(|e| TransportError::ServiceError(e.to_string()))?;
        info!("STDIO transport finished: {:?}", reason);
        Ok(())
    }
}
