pub mod arguments;
pub mod config;
pub mod errors;
pub mod logger;
pub mod prices;
pub mod schedule;
pub mod store;
