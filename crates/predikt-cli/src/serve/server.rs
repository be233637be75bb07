use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use predikt_classifiers::Predictor;

use crate::serve::input::ServeConfig;
use crate::serve::routes::{configure, AppState};

/// Bind and serve until the process receives a shutdown signal.
///
/// The predictor is moved into a single `web::Data` shared by every worker.
pub async fn run_server(config: ServeConfig, predictor: Predictor) -> std::io::Result<()> {
    let state = web::Data::new(AppState { predictor });
    let json_limit = config.json_limit;
    let workers = config.worker_count();

    log::info!(
        "[Predikt::Serve] Listening on http://{} with {} workers",
        config.bind_address(),
        workers
    );
    log::info!("[Predikt::Serve]   POST /predict  - class label for one feature vector");
    log::info!("[Predikt::Serve]   GET  /model    - model metadata");
    log::info!("[Predikt::Serve]   GET  /health   - liveness");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure(json_limit))
    })
    .workers(workers)
    .shutdown_timeout(config.shutdown_timeout_secs)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
