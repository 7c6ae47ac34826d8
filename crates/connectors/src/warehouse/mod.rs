pub mod adapter;
pub mod clickhouse;
pub mod config;
pub mod error;
