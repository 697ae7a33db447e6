//! Celebrity Face Classification Service Library

pub mod api;
pub mod artifacts;
pub mod config;
pub mod engine;
pub mod error;
pub mod price;
pub mod service;
pub mod utils;

pub use config::Config;
pub use error::{Error, Result};
