pub mod config;
pub mod logging;

pub mod batch;
pub mod checksum;
pub mod fetch;
pub mod naming;
pub mod sheet;
pub mod sink;
pub mod storage;
