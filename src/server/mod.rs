pub mod app;
pub mod error;
pub mod pagination;
pub mod quiz;

mod deserializers;
mod extractors;
mod routes;
