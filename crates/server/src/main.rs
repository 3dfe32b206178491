use assistant::{Assistant, Unconfigured, gemini::GeminiClient};
use log::{error, info, warn};
use migration::{Migrator, MigratorTrait};
use server::{
    app::app, auth::AccessClaims, config::Config, state::AppState,
    utils::shutdown::shutdown_signal,
};
use std::{error::Error, sync::Arc};
use tower::ServiceBuilder;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        error!("{err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;

    let db = database::db::connect(&config.database_url).await?;
    if config.run_migrations {
        Migrator::up(&db, None).await?;
        info!("Migrations applied");
    }

    let assistant: Arc<dyn Assistant> = match &config.gemini_api_key {
        Some(key) => Arc::new(GeminiClient::new(key.clone(), config.gemini_model.clone())),
        None => {
            warn!("GEMINI_API_KEY is not set, assistant endpoints will fail");
            Arc::new(Unconfigured)
        }
    };

    let mut builder =
        OAuth2ResourceServer::<AccessClaims>::builder().issuer_url(config.oidc_issuer_url.as_str());
    if let Some(audience) = &config.oidc_audience {
        builder = builder.audiences(&[audience.as_str()]);
    }
    let oauth2_resource_server = builder
        .build()
        .await
        .map_err(|err| format!("Failed to build OAuth2ResourceServer: {err:?}"))?;

    let app = app(AppState::new(db, assistant), |router| {
        router.layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer()))
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Running axum on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
