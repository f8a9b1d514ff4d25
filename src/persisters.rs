pub mod csv_storage;
pub mod json_storage;
pub mod memory_storage;
pub mod storage;
