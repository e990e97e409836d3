//! Shared library for the AntGuide web application
//!
//! Provides the error taxonomy, root folder and configuration resolution,
//! database initialization, typed row models, and demo-content seeding used
//! by the antguide-web service.

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
