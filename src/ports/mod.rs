//! Port traits at the I/O seams.

pub mod config_port;
pub mod data_port;
pub mod report_port;
pub mod ticker_feed_port;
