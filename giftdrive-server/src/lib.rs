pub mod export;
pub mod server;
pub mod storage;
