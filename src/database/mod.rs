//! Acceso a la base de datos

pub mod connection;

pub use connection::{create_pool, with_retry, MAX_DB_ATTEMPTS};
