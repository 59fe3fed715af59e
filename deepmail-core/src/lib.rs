//! Deepmail Core - Core data structures and trait definitions
//!
//! This module defines the shared abstractions of the deepmail system: the
//! agent runtime, the email sender and the conversation store seams, plus
//! the configuration, error and logging infrastructure every crate uses.

pub mod async_utils;
pub mod config;
pub mod error;
pub mod logging;
pub mod traits;
pub mod types;

pub use async_utils::*;
pub use config::*;
pub use error::*;
pub use logging::*;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tokio;
pub use tracing;
