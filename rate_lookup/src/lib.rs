pub mod config;
pub mod contracts;
pub mod form;
pub mod proxy_client;
pub mod state;
