use market_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (.env is optional)
    let _ = dotenv::dotenv();
    init_logger_with_file(Some("info"), std::env::var("LOG_DIR").ok().as_deref());

    tracing::info!("Market server starting...");

    // 2. Configuration
    let config = Config::from_env();

    // 3. State (work dir + database)
    let state = ServerState::initialize(&config).await;

    // 4. HTTP server
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}
