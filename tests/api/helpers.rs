use bigdecimal::BigDecimal;
use diesel::{Connection, PgConnection, RunQueryDsl};
use fake::{faker::lorem::en::Word, Fake};
use once_cell::sync::Lazy;
use restaurant::{
    configuration::{Backend, DatabaseSettings, Settings, StationLookup},
    startup::Application,
    storage::{MemoryStorage, PgStorage, Storage},
    telemetry::{get_subscriber, init_subscriber},
};
use serde_json::{json, Value};
use uuid::Uuid;

static LOGGER_INSTANCE: Lazy<()> = Lazy::new(|| {
    let log_level = "info".to_string();
    let name = "restaurant-test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, log_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name, log_level, std::io::sink);
        init_subscriber(subscriber);
    }

    ()
});

pub struct TestApp<S = MemoryStorage>{
    pub host: String,
    pub port: u16,
    pub storage: S,
    pub api_client: reqwest::Client
}

fn test_settings(station_lookup: StationLookup) -> Settings{
    let mut settings = Settings::get().expect("Failed to read configuration");
    settings.application.port = 0;
    settings.orders.station_lookup = station_lookup;
    settings
}

impl TestApp {
    pub async fn spawn_app() -> TestApp{
        TestApp::spawn_app_with(StationLookup::InTransaction).await
    }

    pub async fn spawn_app_with(station_lookup: StationLookup) -> TestApp{
        Lazy::force(&LOGGER_INSTANCE);

        Self::serve(test_settings(station_lookup), MemoryStorage::new())
    }
}

impl TestApp<PgStorage> {
    // Every app gets its own freshly migrated database
    pub async fn spawn_pg_app() -> TestApp<PgStorage>{
        Lazy::force(&LOGGER_INSTANCE);

        let mut settings = test_settings(StationLookup::InTransaction);
        settings.database.backend = Backend::Postgres;
        settings.database.name = Uuid::new_v4().to_string();

        let storage = Self::create_db(&settings.database);

        Self::serve(settings, storage)
    }

    fn create_db(settings: &DatabaseSettings) -> PgStorage{
        let mut connection = PgConnection::establish(&settings.get_server_url())
                                .expect("Failed to connect to postgres server");

        let query = format!(r#"CREATE DATABASE "{}";"#, settings.name);
        diesel::sql_query(query)
            .execute(&mut connection)
            .expect("Failed to create test database");

        let storage = PgStorage::connect(settings).expect("Failed to build connection pool to test database");
        storage.run_migrations().expect("Failed to run migrations");

        storage
    }
}

impl<S: Storage> TestApp<S> {
    fn serve(settings: Settings, storage: S) -> TestApp<S>{
        let application = Application::build(settings, storage.clone())
                            .expect("Failed to build application");

        let host = application.host.clone();
        let port = application.port;
        tokio::task::spawn(application.run_until_stopped());

        TestApp{
            host,
            port,
            storage,
            api_client: reqwest::Client::new()
        }
    }

    pub fn get_app_url(&self) -> String{
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn api_url(&self, path: &str) -> String{
        format!("{}/api/v1{}", self.get_app_url(), path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response{
        self.api_client
            .post(self.api_url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> reqwest::Response{
        self.api_client
            .put(self.api_url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response{
        self.api_client
            .get(self.api_url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response{
        self.api_client
            .delete(self.api_url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    // Creates a product with a generated name and returns its id
    pub async fn create_product(&self, price: &str, station: &str) -> i32{
        let name: String = Word().fake();
        let body = json!({
            "name": name,
            "category": "Food",
            "price": price,
            "station": station
        });

        let response = self.post_json("/products", &body).await;
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.expect("Failed to parse body");
        body["data"]["id"].as_i64().expect("Product id missing") as i32
    }

    pub async fn post_order(&self, table_number: i32, items: &[(i32, i32)]) -> reqwest::Response{
        let items: Vec<Value> = items
            .iter()
            .map(|(product_id, quantity)| json!({ "product_id": product_id, "quantity": quantity }))
            .collect();

        self.post_json("/orders", &json!({ "table_number": table_number, "items": items })).await
    }
}

pub fn decimal(value: &Value) -> BigDecimal{
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string()
    };
    text.parse().expect("Not a decimal")
}

pub fn dec(text: &str) -> BigDecimal{
    text.parse().expect("Not a decimal")
}
