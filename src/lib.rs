pub mod configuration;
pub mod db_interaction;
pub mod domain;
pub mod models;
pub mod response;
pub mod routes;
pub mod schema;
pub mod startup;
pub mod storage;
pub mod telemetry;
pub mod utils;
