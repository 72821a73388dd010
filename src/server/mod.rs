pub mod routes;

use crate::{
    config::Config,
    router::{ImageProvider, RouterClient},
};
use actix_web::{web, App, HttpServer};
use std::sync::Arc;

pub struct AppState {
    pub provider: Arc<dyn ImageProvider>,
}

/// Route table shared by the real server and the test harness.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(routes::json_error_handler())
        .service(routes::index)
        .service(routes::generate);
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let provider: Arc<dyn ImageProvider> = Arc::new(RouterClient::new(config.router.clone()));
    serve(provider, &config.host, config.port).await
}

pub async fn serve(
    provider: Arc<dyn ImageProvider>,
    host: &str,
    port: u16,
) -> std::io::Result<()> {
    let state = web::Data::new(AppState { provider });

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host, port))?
        .run()
        .await
}
