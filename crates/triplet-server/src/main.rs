use tracing_subscriber::EnvFilter;
use triplet_server::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let server = Server::bind(&format!("0.0.0.0:{port}")).await?;
    tracing::info!(%port, "Triplet server running");

    server.run().await?;
    Ok(())
}
