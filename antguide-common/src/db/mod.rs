//! Database access layer

pub mod init;
pub mod models;
pub mod seed;

pub use init::init_database;
pub use seed::seed_demo_content;
