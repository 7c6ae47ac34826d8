pub mod browse;
pub mod error;
pub mod export;
pub mod import;
pub mod loader;
pub mod outcome;
