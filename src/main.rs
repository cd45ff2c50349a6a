use std::{process::ExitCode, sync::Arc};

use scripterio_mcp::{
    config::Config,
    http_client::ReqwestHttpClient,
    logging,
    transport::stdio::StdioServer,
    AppState,
};
use tokio::io::{Stdin, Stdout};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let (config, server) = match start() {
        Ok(started) => started,
        Err(err) => {
            eprintln!("Error during startup: {err}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        server_name = config.server_name,
        server_version = config.server_version,
        "server starting"
    );
    eprintln!("{}", config.banner());

    if let Err(err) = server.run().await {
        error!(error = %err, "transport failed");
        eprintln!("Fatal error in main(): {err}");
        return ExitCode::FAILURE;
    }

    info!("server stopped");
    ExitCode::SUCCESS
}

fn start() -> Result<(Config, StdioServer<Stdin, Stdout>), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    logging::init_logging(config.env_filter());

    let http_client = Arc::new(ReqwestHttpClient::new()?);
    let state = AppState::new(http_client);
    let server = StdioServer::connect(state);

    Ok((config, server))
}
