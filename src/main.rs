use std::path::Path;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{info, warn};

use djgoprod::config_loader::load_snapshot;
use djgoprod::handlers::{configure, GuardPolicy, RequestGuard};
use djgoprod::{
    validate, AccountStore, EnvironmentSnapshot, GoogleIdentityProvider, IdentityProvider,
    ServerConfig,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let server_config = ServerConfig::default();

    // Configuration file problems never block startup
    let snapshot = match load_snapshot(Path::new(&server_config.config_file)) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("{}; using environment variables only", e);
            EnvironmentSnapshot::from_env()
        }
    };

    let (config, transcript) = validate(&snapshot);
    print!("{}", transcript.render());
    transcript.log_summary();

    let provider: Arc<dyn IdentityProvider> =
        Arc::new(GoogleIdentityProvider::new(config.oauth.clone()).map_err(std::io::Error::other)?);
    let store = AccountStore::new();
    let policy = GuardPolicy::from_config(&config);
    let config = web::Data::new(config);
    let provider = web::Data::from(provider);

    info!(
        "Starting djgoprod accounts server on http://{}:{} ({} deployment)",
        server_config.host, server_config.port, config.mode
    );
    info!("Database engine: {}", config.database.engine());
    if config.debug {
        warn!("DEBUG is enabled");
    }

    HttpServer::new(move || {
        App::new()
            .wrap(RequestGuard::new(policy.clone()))
            .wrap(Logger::default())
            .app_data(config.clone())
            .app_data(web::Data::new(store.clone()))
            .app_data(provider.clone())
            .configure(configure)
    })
    .bind((server_config.host.as_str(), server_config.port))?
    .run()
    .await
}
