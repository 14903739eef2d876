pub mod errors;
pub mod kinds;
pub mod models;
pub mod ports;
pub mod service;
