use std::io;
use std::process::ExitCode;

use roi_calc_mcp::logging::init_tracing;
use roi_calc_mcp::{McpServer, ServerConfig, Transport};
use tracing::{error, info};

fn main() -> ExitCode {
    init_tracing();

    let config = match ServerConfig::from_env() {
        Ok(v) => v,
        Err(err) => {
            error!(%err, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(
        market = %config.market,
        style = config.report.style.as_str(),
        "roi-calcd starting"
    );

    let server = McpServer::new(config);
    let served: io::Result<()> = match server.config().transport {
        Transport::Stdio => server.serve_stdio(),
    };
    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "stdio transport failed");
            ExitCode::FAILURE
        }
    }
}
