pub mod adapter;
pub mod error;
pub mod settings;
pub mod writer;
