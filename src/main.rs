use std::sync::Arc;

use camp_registration::config::RegistrationConfig;
use camp_registration::draft::{DraftStore, LibSqlDraftStore};
use camp_registration::nav::{MemoryNavigator, Navigator};
use camp_registration::routes::{RegistrationRouteState, registration_routes};
use camp_registration::submit::SubmissionCoordinator;
use camp_registration::transport::{HttpTransport, Transport};
use camp_registration::wizard::controller::WizardController;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = RegistrationConfig::from_env();

    eprintln!("📋 Camp Registration v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/api/registration", config.bind_port);
    eprintln!("   Submit endpoint: {}", config.transport_endpoint);
    eprintln!("   Session: {}", config.session);

    // ── Draft store ──────────────────────────────────────────────────────
    let db_path = std::path::Path::new(&config.db_path);
    let drafts: Arc<dyn DraftStore> = Arc::new(
        LibSqlDraftStore::new_local(db_path).await.unwrap_or_else(|e| {
            eprintln!("Error: Failed to open draft database at {}: {}", config.db_path, e);
            std::process::exit(1);
        }),
    );
    eprintln!("   Drafts: {}", config.db_path);

    // ── Wizard ───────────────────────────────────────────────────────────
    let nav: Arc<MemoryNavigator> = Arc::new(MemoryNavigator::new("/"));
    let controller = Arc::new(
        WizardController::start(
            config.session.clone(),
            Arc::clone(&drafts),
            Arc::clone(&nav) as Arc<dyn Navigator>,
        )
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: Failed to start the registration session: {}", e);
            std::process::exit(1);
        }),
    );
    eprintln!("   Step: {}\n", controller.current_step().await);

    // ── Submission ───────────────────────────────────────────────────────
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(
        config.transport_endpoint.clone(),
        config.submit_timeout,
    )?);
    let coordinator = Arc::new(SubmissionCoordinator::new(
        transport,
        Arc::clone(&nav) as Arc<dyn Navigator>,
    ));

    // ── Server ───────────────────────────────────────────────────────────
    let app = registration_routes(RegistrationRouteState {
        controller,
        coordinator,
    });
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.bind_port)).await?;
    tracing::info!(port = config.bind_port, "Registration server started");
    axum::serve(listener, app).await?;

    Ok(())
}
