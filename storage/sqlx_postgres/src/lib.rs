pub mod configuration;
pub mod connection;
pub mod migrations;
pub mod repository;
pub mod region_store;
