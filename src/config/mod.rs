//! Configuration constants
//!
//! - [`defaults`] - Default values for network and CLI behavior
//! - [`urls`] - Upstream API endpoints

pub mod defaults;
pub mod urls;
