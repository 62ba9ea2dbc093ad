use crowdfund::{config::Config, create_app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let db = db::connect(&config).await?;

    // Run our server
    let app = create_app(AppState::new(db));
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
