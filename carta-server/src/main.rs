use carta_server::{print_banner, setup_environment, Config, Server, ServerState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Environment, work dir, logging
    setup_environment()?;

    print_banner();
    tracing::info!("🍽️ Carta server starting...");

    let config = Config::from_env();
    let state = ServerState::initialize(&config).await;

    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
