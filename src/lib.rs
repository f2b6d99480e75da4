pub mod app;
pub mod cli;
pub mod codec;
pub mod error;
pub mod storage;
pub mod store;
pub mod term;
pub mod types;
pub mod utils;
