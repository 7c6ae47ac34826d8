pub mod csv;
pub mod storage;
