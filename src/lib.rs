pub mod common;
pub mod config;
pub mod domain;
pub mod importer;
pub mod observability;
pub mod server;
pub mod storage;
