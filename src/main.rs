use packopt::infrastructure::logging;
use packopt::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = ServerConfig::from_env()?;
    start_server(config).await?;

    Ok(())
}
