use anyhow::Context;
use restaurant::{
    configuration::{Backend, Settings},
    startup::Application,
    storage::{MemoryStorage, PgStorage},
    telemetry::{get_subscriber, init_subscriber},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()>{
    let subscriber = get_subscriber("Restaurant".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let settings = Settings::get().context("Failed to read configuration")?;

    let application = match settings.database.backend {
        Backend::Postgres => {
            let storage = PgStorage::connect(&settings.database)?;
            if settings.database.run_migrations {
                storage.run_migrations()?;
            }
            Application::build(settings, storage)?
        },
        Backend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on shutdown");
            Application::build(settings, MemoryStorage::new())?
        }
    };

    tracing::info!(host = %application.host, port = application.port, "Starting server");
    application.run_until_stopped().await?;
    Ok(())
}
