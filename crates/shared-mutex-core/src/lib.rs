//! Core traits and types for store-backed shared mutexes.

pub mod error;
pub mod mutex;
pub mod name;
pub mod notification;
pub mod prelude;
pub mod state;
pub mod traits;
pub mod ttl;

pub use error::{LockError, LockResult};
pub use prelude::*;
