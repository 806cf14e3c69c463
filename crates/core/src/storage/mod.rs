pub mod file_store;
pub mod keys;
pub mod kv;
pub mod memory_store;
