//! Data models for salewatch

mod message;
mod revenue;
mod sale;

pub use message::*;
pub use revenue::*;
pub use sale::*;
