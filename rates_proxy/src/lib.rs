pub mod config;
pub mod contracts;
