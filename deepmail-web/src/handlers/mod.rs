//! HTTP request handlers for the Deepmail web server

pub mod conversations;
pub mod extract;
pub mod health;
pub mod research;
pub mod simulate;
pub mod types;
pub mod webhook;

pub use conversations::*;
pub use extract::ApiJson;
pub use health::*;
pub use research::*;
pub use simulate::*;
pub use webhook::*;

pub use types::*;
