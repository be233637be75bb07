pub mod error;
pub mod input;
pub mod routes;
pub mod server;
