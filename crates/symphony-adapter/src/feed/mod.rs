//! Datafeed polling: listener capability and the long-running worker.

pub mod listener;
pub mod worker;

pub use listener::*;
pub use worker::*;
