pub mod file;
pub mod warehouse;
