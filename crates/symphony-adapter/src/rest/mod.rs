//! REST layer: TLS transport construction, certificate authentication,
//! and the datafeed client the polling worker drives.

pub mod auth;
pub mod datafeed;
pub mod transport;

pub use auth::*;
pub use datafeed::*;
pub use transport::*;
