//! Request/response types used by the handlers

pub mod common;
pub mod email;
pub mod research;

pub use common::*;
pub use email::*;
pub use research::*;
