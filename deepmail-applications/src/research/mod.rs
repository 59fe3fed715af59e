//! Deep research pipeline
//!
//! Query → follow-up questions → search plan → concurrent searches →
//! report → email. Progress is reported as a stream of [`ResearchUpdate`]s.

pub mod manager;
pub mod types;

pub use manager::{ResearchManager, BLANK_QUERY_MESSAGE};
pub use types::{ResearchSession, ResearchUpdate};
