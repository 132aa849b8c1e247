//! Browser automation module
//!
//! Handles launching and controlling a single headless Chrome/Chromium
//! instance over the Chrome DevTools Protocol.

mod actions;
mod errors;
mod session;

pub use actions::PageActions;
pub use errors::BrowserError;
pub use session::{BrowserSession, BrowserSessionConfig};
