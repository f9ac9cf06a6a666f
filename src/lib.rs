pub mod cli;
pub mod client;
pub mod collector;
pub mod config;
pub mod edit;
pub mod error;
pub mod pipeline;
