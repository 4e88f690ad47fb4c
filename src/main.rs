// Pipeline CRM server

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use pipeline_crm::{api::create_router, app_state::AppState, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pipeline_crm=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize application state; returns once the session has loaded
    let app_state = AppState::new(config.clone()).await?;

    let mut app = Router::new().nest("/api", create_router(app_state));
    if let Some(dir) = &config.server.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = config.server_address();
    println!("🚀 Pipeline CRM starting on http://{}", addr);
    println!("📋 API:");
    println!("  GET  /api/session                    - Session state and view to render");
    println!("  POST /api/auth/signup|login|logout   - Authentication forms");
    println!("  POST /api/auth/password              - Change password");
    println!("  GET  /api/profile                    - Profile view");
    println!("  GET  /api/tabs                       - Dashboard tabs");
    println!("  GET  /api/networking                 - Networking tab (?include_skipped=true)");
    println!("  POST /api/networking[/skip]          - Add contact / skip record");
    println!("  GET  /api/info, POST /api/info       - Info tab");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
