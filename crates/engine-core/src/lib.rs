pub mod catalog;
pub mod error;
pub mod export;
pub mod inference;
pub mod projection;
pub mod sanitize;
pub mod schema;
