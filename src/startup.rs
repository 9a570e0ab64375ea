use std::net::TcpListener;

use actix_web::{dev::Server, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use crate::{
    configuration::{OrderSettings, Settings},
    routes::{api_v1, bad_request_handler, health_check},
    storage::Storage,
};

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    pub fn build<S: Storage>(settings: Settings, storage: S) -> Result<Self, anyhow::Error>{
        let address = format!("{}:{}", settings.application.host, settings.application.port);
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind to {}", address))?;
        let port = listener.local_addr()?.port();

        let server = run(listener, storage, settings.orders)?;

        Ok(Application{
            host: settings.application.host,
            port,
            server
        })
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run<S: Storage>(
    listener: TcpListener,
    storage: S,
    orders: OrderSettings
) -> Result<Server, anyhow::Error> {
    let storage = web::Data::new(storage);
    let orders = web::Data::new(orders);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(bad_request_handler))
            .app_data(web::QueryConfig::default().error_handler(bad_request_handler))
            .app_data(web::PathConfig::default().error_handler(bad_request_handler))
            .app_data(storage.clone())
            .app_data(orders.clone())
            .route("/health", web::get().to(health_check))
            .service(web::scope("/api/v1").configure(api_v1::<S>))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
