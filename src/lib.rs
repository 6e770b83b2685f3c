pub mod app;
pub mod bootstrap;
pub mod config;
pub mod docs;
pub mod routes;
pub mod socket;
