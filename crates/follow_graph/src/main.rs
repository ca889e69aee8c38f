use dotenv::dotenv;
use follow_graph::settings;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let settings = settings::load_settings()?;
    follow_graph::init_tracing(&settings);
    let port = settings.port.unwrap_or(3000);

    if !settings.is_production() {
        debug!("Running in DEV environment");
    }

    let app = follow_graph::setup_router(&settings).await?;
    let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on http://{}", listener.local_addr()?);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }

    Ok(())
}
