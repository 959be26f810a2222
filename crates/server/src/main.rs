//! bizmatch Server - HTTP API for catalog criteria matching
//!
//! Serves `GET /` and `POST /` on `PORT` (default 3000).

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;

    // Start server
    server::start_server(config).await?;

    Ok(())
}
