pub mod api;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod password;
pub mod routes;
pub mod services;
pub mod state;
pub mod week;
