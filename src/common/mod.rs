//! Common utilities shared by the parser, runner and CLI

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};
