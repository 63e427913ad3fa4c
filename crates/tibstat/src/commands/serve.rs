//! Serve command: run the MCP server on stdio.

use clap::Args;
use rmcp::ServiceExt;
use tibstat_core::Config;
use tracing::{info, instrument};

use crate::server::StatServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Serve the segmentation tools over the MCP stdio transport until the
/// client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    let server = StatServer::new(config.segment_options(), max_input);
    info!(algorithm = %config.algorithm, "starting MCP server on stdio");

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| anyhow::anyhow!("failed to start MCP server: {e}"))?;
    service
        .waiting()
        .await
        .map_err(|e| anyhow::anyhow!("MCP server stopped with an error: {e}"))?;

    info!("MCP server stopped");
    Ok(())
}
