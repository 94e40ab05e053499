use crate::app::{App, Services};
use crate::config::Config;
use crate::db::{init_db, Database};
use crate::router::handle;
use astra::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod analysis;
mod app;
mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod format;
mod narrative;
mod pipeline;
mod providers;
mod responses;
mod router;
mod scraper;
mod templates;

#[cfg(test)]
mod tests;

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info");
            error!(error = %e, "configuration rejected");
            std::process::exit(1);
        }
    };
    init_tracing(&config.log_level);

    let db = Database::new(&config.db_path);
    if let Err(e) = init_db(&db, &config.schema_path) {
        error!(error = %e, path = %config.db_path, "database initialization failed");
        std::process::exit(1);
    }

    let services = match Services::from_config(&config) {
        Ok(services) => services,
        Err(e) => {
            error!(error = %e, "could not build outbound clients");
            std::process::exit(1);
        }
    };
    let app = App::new(db, services);

    info!(addr = %config.bind_addr, workers = config.max_workers, "starting server");

    let result = Server::bind(&config.bind_addr)
        .max_workers(config.max_workers)
        .serve(move |req, _info| handle(req, &app));

    match result {
        Ok(()) => info!("server shut down cleanly"),
        Err(e) => error!(error = %e, "server ended with error"),
    }
}
