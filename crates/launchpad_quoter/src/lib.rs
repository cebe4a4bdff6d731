pub mod chain;
pub mod config;
pub mod error;
pub mod fees;
pub mod quote;
pub mod supply;

pub use chain::*;
pub use config::*;
pub use error::*;
pub use fees::*;
pub use quote::*;
pub use supply::*;
pub use launchpad_primitives::*;
