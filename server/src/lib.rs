pub mod checkin;
pub mod config;
pub mod handlers;
pub mod models;
pub mod qr;
pub mod registry;
pub mod routes;
pub mod state;
pub mod utils;
